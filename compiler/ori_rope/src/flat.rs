//! Non-balancing leaf sequence implementing the rope contracts.

use std::fmt;
use std::ptr;

use tracing::trace;

use super::{Metric, Metrics, Monoid, RopeCursor};

/// A rope stored as a flat list of leaves plus running metric sums.
///
/// Leaves are kept within the monoid's `max_leaf_size` through `split` and
/// `merge`, but there is no tree: scans are binary searches over prefix sums
/// and edits recompute the sums after the touched leaf.
pub struct FlatRope<M: Monoid> {
    monoid: M,
    leaves: Vec<M::Leaf>,
    /// `prefix[i]` sums the metrics of `leaves[..i]`; one longer than `leaves`.
    prefix: Vec<Metrics>,
}

impl<M: Monoid> FlatRope<M> {
    /// Create an empty rope.
    pub fn new(monoid: M) -> Self {
        let zero = Metrics::zero(monoid.metrics().len());
        FlatRope {
            monoid,
            leaves: Vec::new(),
            prefix: vec![zero],
        }
    }

    /// Create a rope from `leaves`, merging and splitting them as they are pushed.
    pub fn from_leaves<I: IntoIterator<Item = M::Leaf>>(monoid: M, leaves: I) -> Self {
        let mut rope = FlatRope::new(monoid);
        for leaf in leaves {
            rope.push_leaf(leaf);
        }
        rope
    }

    #[inline]
    pub fn monoid(&self) -> &M {
        &self.monoid
    }

    #[inline]
    pub fn leaves(&self) -> &[M::Leaf] {
        &self.leaves
    }

    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Sum of `metric` over the whole rope.
    pub fn total(&self, metric: Metric) -> usize {
        self.prefix
            .last()
            .map_or(0, |metrics| metrics.get(metric))
    }

    /// Append `leaf`, merging it into the last leaf when the result still fits.
    ///
    /// Empty leaves are dropped.
    pub fn push_leaf(&mut self, leaf: M::Leaf) {
        let size = self.monoid.leaf_size(&leaf);
        if size == 0 {
            return;
        }
        let merged = match self.leaves.last() {
            Some(last) if self.monoid.leaf_size(last) + size <= self.monoid.max_leaf_size() => {
                let merged = self.monoid.merge(last, &leaf);
                self.leaves.pop();
                self.prefix.pop();
                merged
            }
            _ => leaf,
        };
        for part in self.normalize(merged) {
            self.append(part);
        }
    }

    /// Replace the leaf at `index`, splitting the replacement if it is oversize.
    ///
    /// An empty replacement removes the leaf.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace_leaf(&mut self, index: usize, leaf: M::Leaf) {
        assert!(
            index < self.leaves.len(),
            "leaf index {index} out of bounds (leaf count {})",
            self.leaves.len()
        );
        let parts = if self.monoid.leaf_size(&leaf) == 0 {
            Vec::new()
        } else {
            self.normalize(leaf)
        };
        trace!(index, parts = parts.len(), "replacing leaf");
        self.leaves.splice(index..=index, parts);
        self.recompute_prefix(index);
    }

    /// Cursor on the first leaf, or `None` for an empty rope.
    pub fn cursor(&self) -> Option<FlatCursor<'_, M>> {
        if self.leaves.is_empty() {
            None
        } else {
            Some(FlatCursor {
                rope: self,
                index: 0,
            })
        }
    }

    /// Cursor on the leaf containing `value` under `metric`.
    pub fn cursor_at(&self, metric: Metric, value: usize) -> Option<FlatCursor<'_, M>> {
        self.cursor().map(|cursor| cursor.scan(self, metric, value))
    }

    fn normalize(&self, leaf: M::Leaf) -> Vec<M::Leaf> {
        let size = self.monoid.leaf_size(&leaf);
        if size <= self.monoid.max_leaf_size() {
            return vec![leaf];
        }
        let parts = self.monoid.split(&leaf);
        trace!(size, parts = parts.len(), "split oversize leaf");
        debug_assert!(parts
            .iter()
            .all(|part| self.monoid.leaf_size(part) <= self.monoid.max_leaf_size()));
        parts
    }

    fn append(&mut self, leaf: M::Leaf) {
        let measured = self.monoid.measure(&leaf);
        let total = self.last_prefix().clone() + &measured;
        self.leaves.push(leaf);
        self.prefix.push(total);
    }

    fn recompute_prefix(&mut self, from: usize) {
        self.prefix.truncate(from + 1);
        for leaf in &self.leaves[from..] {
            let measured = self.monoid.measure(leaf);
            let total = self.last_prefix().clone() + &measured;
            self.prefix.push(total);
        }
    }

    fn last_prefix(&self) -> &Metrics {
        // `prefix` always holds at least the leading zero entry.
        &self.prefix[self.prefix.len() - 1]
    }

    /// Index of the leaf whose half-open range under `metric` contains `value`.
    ///
    /// Leaves that are empty under `metric` are never selected unless they
    /// are last; values past the end clamp to the last leaf.
    fn leaf_index_for(&self, metric: Metric, value: usize) -> usize {
        let index = self.prefix[1..].partition_point(|end| end.get(metric) <= value);
        index.min(self.leaves.len().saturating_sub(1))
    }
}

impl<M: Monoid> fmt::Debug for FlatRope<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatRope")
            .field("leaves", &self.leaves.len())
            .field("totals", self.last_prefix())
            .finish()
    }
}

/// Cursor over a [`FlatRope`]. The owner capability is the rope itself.
pub struct FlatCursor<'r, M: Monoid> {
    rope: &'r FlatRope<M>,
    index: usize,
}

impl<M: Monoid> FlatCursor<'_, M> {
    /// Position of the current leaf in [`FlatRope::leaves`].
    #[inline]
    pub fn leaf_index(&self) -> usize {
        self.index
    }

    fn check_owner(&self, owner: &FlatRope<M>) {
        assert!(
            ptr::eq(self.rope, owner),
            "cursor moved with a capability from a different rope"
        );
    }
}

impl<M: Monoid> Clone for FlatCursor<'_, M> {
    fn clone(&self) -> Self {
        FlatCursor {
            rope: self.rope,
            index: self.index,
        }
    }
}

impl<M: Monoid> fmt::Debug for FlatCursor<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatCursor")
            .field("leaf_index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<M: Monoid> RopeCursor for FlatCursor<'_, M> {
    type Leaf = M::Leaf;
    type Owner = FlatRope<M>;

    #[inline]
    fn element(&self) -> &M::Leaf {
        &self.rope.leaves[self.index]
    }

    #[inline]
    fn location(&self, metric: Metric) -> usize {
        self.rope.prefix[self.index].get(metric)
    }

    #[inline]
    fn size(&self, metric: Metric) -> usize {
        self.rope.prefix[self.index + 1].get(metric) - self.location(metric)
    }

    fn next(&self, owner: &FlatRope<M>) -> Option<Self> {
        self.check_owner(owner);
        let index = self.index + 1;
        if index < self.rope.leaves.len() {
            Some(FlatCursor {
                rope: self.rope,
                index,
            })
        } else {
            None
        }
    }

    fn scan(&self, owner: &FlatRope<M>, metric: Metric, value: usize) -> Self {
        self.check_owner(owner);
        FlatCursor {
            rope: self.rope,
            index: self.rope.leaf_index_for(metric, value),
        }
    }

    fn same_position(&self, other: &Self) -> bool {
        ptr::eq(self.rope, other.rope) && self.index == other.index
    }
}

#[cfg(test)]
mod tests;
