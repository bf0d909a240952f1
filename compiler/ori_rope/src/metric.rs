//! Metric handles and aggregated metric values.

use smallvec::SmallVec;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Opaque handle naming one additive quantity maintained by a rope.
///
/// The handle carries the slot it occupies in [`Metrics`]; the name is only
/// used for diagnostics. Two metrics are equal when both slot and name match.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Metric {
    index: u8,
    name: &'static str,
}

impl Metric {
    /// Create a metric stored in slot `index`.
    #[inline]
    pub const fn new(index: u8, name: &'static str) -> Self {
        Metric { index, name }
    }

    /// Slot of this metric inside [`Metrics`].
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.index)
    }
}

/// Aggregated values of every metric of a monoid, one slot per metric.
///
/// Values are plain sums: the metrics of a subtree are the slot-wise sum of
/// the metrics of its leaves.
#[derive(Clone, Eq, PartialEq, Hash, Default)]
pub struct Metrics(SmallVec<[usize; 4]>);

impl Metrics {
    /// All-zero metrics with `len` slots.
    pub fn zero(len: usize) -> Self {
        Metrics(smallvec::smallvec![0; len])
    }

    pub fn from_values<I: IntoIterator<Item = usize>>(values: I) -> Self {
        Metrics(values.into_iter().collect())
    }

    /// Value of `metric`.
    ///
    /// # Panics
    ///
    /// Panics if `metric` has no slot in these metrics.
    #[inline]
    pub fn get(&self, metric: Metric) -> usize {
        match self.0.get(metric.index()) {
            Some(&value) => value,
            None => panic!(
                "metric {metric:?} has no slot in metrics of length {}",
                self.0.len()
            ),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn values(&self) -> &[usize] {
        &self.0
    }
}

impl AddAssign<&Metrics> for Metrics {
    fn add_assign(&mut self, rhs: &Metrics) {
        assert_eq!(
            self.0.len(),
            rhs.0.len(),
            "cannot add metrics with different slot counts"
        );
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0.iter()) {
            *lhs += *rhs;
        }
    }
}

impl Add<&Metrics> for Metrics {
    type Output = Metrics;

    fn add(mut self, rhs: &Metrics) -> Metrics {
        self += rhs;
        self
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
