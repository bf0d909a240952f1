//! Ori Rope - boundary contracts for augmented-sum ropes
//!
//! A rope stores a sequence of leaves and keeps, for every subtree, the sum
//! of a fixed set of additive metrics. Knowing those sums is what lets a
//! cursor descend to "the leaf containing position P under metric M" in
//! logarithmic time.
//!
//! This crate only fixes the vocabulary shared by rope engines and leaf
//! formats:
//! - [`Metric`] / [`Metrics`]: opaque metric handles and their aggregated values
//! - [`Monoid`]: how to measure, size, merge and split one leaf type
//! - [`RopeCursor`]: a leaf-granular cursor driven through an owner capability
//!
//! [`FlatRope`] is a plain leaf sequence implementing the contract without any
//! balancing. It is enough for small documents and for testing leaf formats.

mod cursor;
mod flat;
mod metric;
mod monoid;

pub use cursor::RopeCursor;
pub use flat::{FlatCursor, FlatRope};
pub use metric::{Metric, Metrics};
pub use monoid::Monoid;
