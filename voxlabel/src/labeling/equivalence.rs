//! Label equivalence tracking for the first labeling pass.
//!
//! Two interchangeable resolvers are provided:
//! - [`EagerEquivalence`]: every table slot always holds its final
//!   representative. A merge rewrites all slots of the losing class, so
//!   lookups are O(1) and merges O(table size).
//! - [`UnionFind`]: parent pointers with path compression.
//!
//! Both keep the numerically smallest label as the representative of a class,
//! so after [`EquivalenceResolver::freeze`] they yield identical tables.

use super::error::LabelingError;
use super::{LabelId, BACKGROUND};

/// Union-find operations needed by the raster scan.
pub trait EquivalenceResolver {
    /// Append a fresh label whose representative is itself.
    fn allocate_new_label(&mut self) -> Result<LabelId, LabelingError>;

    /// Merge the classes of `a` and `b`, keeping the smaller representative.
    fn union(&mut self, a: LabelId, b: LabelId) -> Result<(), LabelingError>;

    /// Number of table entries, including the reserved background slot.
    fn len(&self) -> usize;

    /// Number of merges that actually joined two distinct classes.
    fn merge_count(&self) -> usize;

    /// End the scan and resolve every label to its representative.
    fn freeze(self) -> FrozenEquivalence;
}

/// Table with the reserved `0 -> 0` entry and room for a few labels.
fn new_table() -> Vec<LabelId> {
    let mut table = Vec::with_capacity(256);
    table.push(BACKGROUND);
    table
}

/// Push the next sequential label onto `table`.
fn push_label(table: &mut Vec<LabelId>) -> Result<LabelId, LabelingError> {
    let next = table.len();
    let label = LabelId::try_from(next)
        .map_err(|_| LabelingError::LabelSpaceExhausted { allocated: next - 1 })?;
    table
        .try_reserve(1)
        .map_err(|source| LabelingError::AllocationFailure {
            what: "equivalence table",
            requested: next + 1,
            source,
        })?;
    table.push(label);
    Ok(label)
}

#[inline]
fn lookup(table: &[LabelId], label: LabelId) -> Result<LabelId, LabelingError> {
    table
        .get(label as usize)
        .copied()
        .ok_or(LabelingError::OutOfRange {
            label,
            len: table.len(),
        })
}

// ============================================================================
// Eager rewrite
// ============================================================================

/// Equivalence table where each slot always holds the final representative.
#[derive(Debug, Clone)]
pub struct EagerEquivalence {
    representative: Vec<LabelId>,
    merges: usize,
}

impl Default for EagerEquivalence {
    fn default() -> Self {
        Self::new()
    }
}

impl EagerEquivalence {
    pub fn new() -> Self {
        Self {
            representative: new_table(),
            merges: 0,
        }
    }

    /// O(1) lookup of the current representative of `label`.
    #[inline]
    pub fn representative_of(&self, label: LabelId) -> Result<LabelId, LabelingError> {
        lookup(&self.representative, label)
    }
}

impl EquivalenceResolver for EagerEquivalence {
    #[inline]
    fn allocate_new_label(&mut self) -> Result<LabelId, LabelingError> {
        push_label(&mut self.representative)
    }

    fn union(&mut self, a: LabelId, b: LabelId) -> Result<(), LabelingError> {
        let rep_a = self.representative_of(a)?;
        let rep_b = self.representative_of(b)?;
        if rep_a == rep_b {
            return Ok(());
        }

        let (winner, loser) = if rep_a < rep_b {
            (rep_a, rep_b)
        } else {
            (rep_b, rep_a)
        };
        for slot in self.representative.iter_mut() {
            if *slot == loser {
                *slot = winner;
            }
        }
        self.merges += 1;
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        self.representative.len()
    }

    #[inline]
    fn merge_count(&self) -> usize {
        self.merges
    }

    fn freeze(self) -> FrozenEquivalence {
        FrozenEquivalence {
            representative: self.representative,
        }
    }
}

// ============================================================================
// Union-find
// ============================================================================

/// Union-find with two-pass path compression. The smaller root always wins.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<LabelId>,
    merges: usize,
}

impl Default for UnionFind {
    fn default() -> Self {
        Self::new()
    }
}

impl UnionFind {
    pub fn new() -> Self {
        Self {
            parent: new_table(),
            merges: 0,
        }
    }

    /// Find root with iterative path compression (two-pass).
    pub fn find(&mut self, label: LabelId) -> Result<LabelId, LabelingError> {
        lookup(&self.parent, label)?;

        // First pass: find root
        let mut root = label;
        loop {
            let parent = self.parent[root as usize];
            if parent == root {
                break;
            }
            root = parent;
        }

        // Second pass: compress path
        let mut current = label;
        while current != root {
            let parent = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = parent;
        }

        Ok(root)
    }
}

impl EquivalenceResolver for UnionFind {
    #[inline]
    fn allocate_new_label(&mut self) -> Result<LabelId, LabelingError> {
        push_label(&mut self.parent)
    }

    fn union(&mut self, a: LabelId, b: LabelId) -> Result<(), LabelingError> {
        let root_a = self.find(a)?;
        let root_b = self.find(b)?;
        if root_a != root_b {
            let (smaller, larger) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[larger as usize] = smaller;
            self.merges += 1;
        }
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    fn merge_count(&self) -> usize {
        self.merges
    }

    fn freeze(mut self) -> FrozenEquivalence {
        // Parents always point to smaller labels, so one ascending sweep
        // resolves every slot from already-resolved ones.
        for label in 1..self.parent.len() {
            let parent = self.parent[label] as usize;
            self.parent[label] = self.parent[parent];
        }
        FrozenEquivalence {
            representative: self.parent,
        }
    }
}

// ============================================================================
// Frozen table
// ============================================================================

/// Read-only `label -> representative` table produced at the end of the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenEquivalence {
    representative: Vec<LabelId>,
}

impl FrozenEquivalence {
    /// O(1) lookup of the representative of `label`.
    #[inline]
    pub fn representative_of(&self, label: LabelId) -> Result<LabelId, LabelingError> {
        lookup(&self.representative, label)
    }

    /// Number of table entries, including the background slot.
    #[inline]
    pub fn len(&self) -> usize {
        self.representative.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.representative.len() <= 1
    }

    /// Number of provisional labels allocated during the scan.
    #[inline]
    pub fn provisional_count(&self) -> usize {
        self.representative.len() - 1
    }

    #[inline]
    pub fn as_slice(&self) -> &[LabelId] {
        &self.representative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocate_n<R: EquivalenceResolver>(resolver: &mut R, n: usize) -> Vec<LabelId> {
        (0..n).map(|_| resolver.allocate_new_label().unwrap()).collect()
    }

    #[test]
    fn test_labels_are_sequential_from_one() {
        let mut eq = EagerEquivalence::new();
        assert_eq!(allocate_n(&mut eq, 4), vec![1, 2, 3, 4]);
        assert_eq!(eq.len(), 5);
        assert_eq!(eq.representative_of(0).unwrap(), 0);
        assert_eq!(eq.representative_of(3).unwrap(), 3);
    }

    #[test]
    fn test_representative_out_of_range() {
        let mut eq = EagerEquivalence::new();
        allocate_n(&mut eq, 2);

        let err = eq.representative_of(3).unwrap_err();
        assert!(matches!(err, LabelingError::OutOfRange { label: 3, len: 3 }));
    }

    #[test]
    fn test_union_keeps_minimum() {
        let mut eq = EagerEquivalence::new();
        allocate_n(&mut eq, 3);

        eq.union(3, 2).unwrap();
        assert_eq!(eq.representative_of(3).unwrap(), 2);
        assert_eq!(eq.representative_of(2).unwrap(), 2);
        assert_eq!(eq.representative_of(1).unwrap(), 1);
    }

    #[test]
    fn test_union_rewrites_whole_losing_class() {
        let mut eq = EagerEquivalence::new();
        allocate_n(&mut eq, 5);

        eq.union(4, 5).unwrap();
        eq.union(3, 5).unwrap();
        // {3, 4, 5} all point at 3
        assert_eq!(eq.representative_of(4).unwrap(), 3);
        assert_eq!(eq.representative_of(5).unwrap(), 3);

        eq.union(5, 1).unwrap();
        for label in [1, 3, 4, 5] {
            assert_eq!(eq.representative_of(label).unwrap(), 1);
        }
        assert_eq!(eq.representative_of(2).unwrap(), 2);
        assert_eq!(eq.merge_count(), 3);
    }

    #[test]
    fn test_union_same_class_is_noop() {
        let mut eq = EagerEquivalence::new();
        allocate_n(&mut eq, 2);

        eq.union(1, 2).unwrap();
        eq.union(2, 1).unwrap();
        eq.union(2, 2).unwrap();
        assert_eq!(eq.merge_count(), 1);
    }

    #[test]
    fn test_union_unknown_label_fails() {
        let mut eq = EagerEquivalence::new();
        allocate_n(&mut eq, 1);
        assert!(matches!(
            eq.union(1, 9),
            Err(LabelingError::OutOfRange { label: 9, .. })
        ));

        let mut uf = UnionFind::new();
        allocate_n(&mut uf, 1);
        assert!(uf.union(7, 1).is_err());
    }

    #[test]
    fn test_union_find_compresses_to_smallest_root() {
        let mut uf = UnionFind::new();
        allocate_n(&mut uf, 6);

        uf.union(5, 6).unwrap();
        uf.union(4, 5).unwrap();
        uf.union(2, 4).unwrap();
        assert_eq!(uf.find(6).unwrap(), 2);
        assert_eq!(uf.find(3).unwrap(), 3);
        assert_eq!(uf.merge_count(), 3);
    }

    #[test]
    fn test_resolvers_freeze_identically() {
        let merges = [(7, 3), (2, 9), (9, 7), (5, 6), (10, 1), (6, 10), (4, 4)];

        let mut eq = EagerEquivalence::new();
        let mut uf = UnionFind::new();
        allocate_n(&mut eq, 10);
        allocate_n(&mut uf, 10);
        for (a, b) in merges {
            eq.union(a, b).unwrap();
            uf.union(a, b).unwrap();
        }

        let frozen_eq = eq.freeze();
        let frozen_uf = uf.freeze();
        assert_eq!(frozen_eq, frozen_uf);
        assert_eq!(
            frozen_eq.as_slice(),
            &[0, 1, 2, 2, 4, 1, 1, 2, 8, 2, 1]
        );
        assert_eq!(frozen_eq.provisional_count(), 10);
    }

    #[test]
    fn test_frozen_empty_table() {
        let frozen = EagerEquivalence::new().freeze();
        assert!(frozen.is_empty());
        assert_eq!(frozen.len(), 1);
        assert_eq!(frozen.representative_of(0).unwrap(), 0);
        assert!(frozen.representative_of(1).is_err());
    }
}
