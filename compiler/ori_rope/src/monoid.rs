//! Leaf policy consumed by rope engines.

use super::{Metric, Metrics};

/// Describes how a rope measures, sizes, merges and splits one leaf type.
///
/// A rope keeps every leaf's [`leaf_size`](Monoid::leaf_size) at or below
/// [`max_leaf_size`](Monoid::max_leaf_size): oversize leaves go through
/// [`split`](Monoid::split), undersize neighbors may be joined with
/// [`merge`](Monoid::merge).
///
/// # Laws
///
/// - `measure(merge(a, b)) == measure(a) + measure(b)`
/// - concatenating the leaves returned by `split(leaf)` with `merge`
///   reproduces `leaf`
/// - every leaf returned by `split` has `leaf_size <= max_leaf_size`
pub trait Monoid {
    type Leaf: Clone;

    /// The additive metrics measured for every leaf, in slot order.
    fn metrics(&self) -> &[Metric];

    fn max_leaf_size(&self) -> usize;

    /// Values of every metric in [`metrics`](Monoid::metrics) for `leaf`.
    fn measure(&self, leaf: &Self::Leaf) -> Metrics;

    /// Scalar compared against `max_leaf_size` to decide splits and merges.
    fn leaf_size(&self, leaf: &Self::Leaf) -> usize;

    fn merge(&self, left: &Self::Leaf, right: &Self::Leaf) -> Self::Leaf;

    fn split(&self, leaf: &Self::Leaf) -> Vec<Self::Leaf>;
}
