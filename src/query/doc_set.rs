//! Bit-set of document ids.

use std::fmt;

use bit_vec::BitVec;

use crate::index::DocId;

/// A set of document ids below a fixed `max_doc`, backed by a bit vector.
#[derive(Clone, PartialEq, Eq)]
pub struct DocSet {
    bits: BitVec,
}

impl DocSet {
    /// An empty set sized for `max_doc` documents.
    pub fn empty(max_doc: DocId) -> Self {
        DocSet {
            bits: BitVec::from_elem(max_doc as usize, false),
        }
    }

    /// A set containing every id below `max_doc`.
    pub fn full(max_doc: DocId) -> Self {
        DocSet {
            bits: BitVec::from_elem(max_doc as usize, true),
        }
    }

    /// Build a set from explicit ids; ids at or above `max_doc` are ignored.
    pub fn from_ids<I: IntoIterator<Item = DocId>>(max_doc: DocId, ids: I) -> Self {
        let mut set = DocSet::empty(max_doc);
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Exclusive upper bound of ids this set can hold.
    pub fn max_doc(&self) -> DocId {
        self.bits.len() as DocId
    }

    /// Add an id. Returns false if the id is out of range.
    pub fn insert(&mut self, doc_id: DocId) -> bool {
        if (doc_id as usize) < self.bits.len() {
            self.bits.set(doc_id as usize, true);
            true
        } else {
            false
        }
    }

    /// Remove an id.
    pub fn remove(&mut self, doc_id: DocId) {
        if (doc_id as usize) < self.bits.len() {
            self.bits.set(doc_id as usize, false);
        }
    }

    /// Check membership.
    pub fn contains(&self, doc_id: DocId) -> bool {
        self.bits.get(doc_id as usize).unwrap_or(false)
    }

    /// Number of ids in the set.
    pub fn len(&self) -> usize {
        self.bits.iter().filter(|b| *b).count()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.none()
    }

    /// Keep only ids also present in `other`.
    pub fn intersect_with(&mut self, other: &DocSet) {
        if other.bits.len() == self.bits.len() {
            self.bits.and(&other.bits);
        } else {
            for doc_id in 0..self.max_doc() {
                if !other.contains(doc_id) {
                    self.remove(doc_id);
                }
            }
        }
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, set)| *set)
            .map(|(id, _)| id as DocId)
    }
}

impl fmt::Debug for DocSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut set = DocSet::empty(8);
        assert!(set.is_empty());
        assert!(set.insert(3));
        assert!(set.insert(5));
        assert!(!set.insert(8));

        assert!(set.contains(3));
        assert!(!set.contains(4));
        assert!(!set.contains(100));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 5]);
    }

    #[test]
    fn test_intersect() {
        let mut a = DocSet::full(6);
        let b = DocSet::from_ids(6, [1, 4]);
        a.intersect_with(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 4]);

        let mut c = DocSet::from_ids(6, [1, 2, 5]);
        c.intersect_with(&DocSet::from_ids(3, [2]));
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![2]);
    }
}
