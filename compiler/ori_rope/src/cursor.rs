//! Leaf-granular rope cursor contract.

use super::Metric;

/// A cursor positioned on one leaf of a rope.
///
/// Movement requires the rope's owner capability (`Owner`), which lets the
/// engine enforce whatever traversal discipline it needs. Locations are
/// global: `location(m)` is the sum of `m` over all leaves before the
/// current one.
pub trait RopeCursor: Sized {
    type Leaf;
    type Owner: ?Sized;

    /// The leaf the cursor is positioned on.
    fn element(&self) -> &Self::Leaf;

    /// Global value of `metric` at the start of the current leaf.
    fn location(&self, metric: Metric) -> usize;

    /// Value of `metric` for the current leaf alone.
    fn size(&self, metric: Metric) -> usize;

    /// Cursor on the following leaf, or `None` past the last leaf.
    fn next(&self, owner: &Self::Owner) -> Option<Self>;

    /// Cursor on the leaf containing global position `value` under `metric`.
    ///
    /// Positions at or past the end of the rope resolve to the last leaf.
    fn scan(&self, owner: &Self::Owner, metric: Metric, value: usize) -> Self;

    /// Whether `other` denotes the same cursor as `self`.
    fn same_position(&self, other: &Self) -> bool;
}
