//! Rope policy for [`TokenArray`] leaves.

use ori_rope::{Metric, Metrics, Monoid};
use tracing::debug;

use super::{LeafSizeError, TokenArray};

/// Measures, merges and splits token leaves for an augmented-sum rope.
///
/// Leaves are sized by token count. Splits aim for
/// [`desired_leaf_size`](Self::desired_leaf_size) tokens per leaf so that a
/// freshly split leaf has room to grow before the next forced split.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TokenMonoid {
    max_leaf_size: usize,
    desired_leaf_size: usize,
}

impl TokenMonoid {
    pub const MAX_LEAF_SIZE: usize = 128;
    pub const DESIRED_LEAF_SIZE: usize = 96;

    /// Number of tokens.
    pub const TOKEN_COUNT: Metric = Metric::new(0, "TokenCount");
    /// Number of chars covered by the tokens.
    pub const CHAR_COUNT: Metric = Metric::new(1, "CharCount");
    /// Number of tokens the lexer can restart from.
    pub const RESTARTABLE_STATE_COUNT: Metric = Metric::new(2, "RestartableStateCount");
    /// Number of tokens touched by the most recent edit.
    pub const EDIT_COUNT: Metric = Metric::new(3, "EditCount");

    const METRICS: [Metric; 4] = [
        Self::TOKEN_COUNT,
        Self::CHAR_COUNT,
        Self::RESTARTABLE_STATE_COUNT,
        Self::EDIT_COUNT,
    ];

    /// Monoid with the default leaf sizes.
    pub const fn new() -> Self {
        TokenMonoid {
            max_leaf_size: Self::MAX_LEAF_SIZE,
            desired_leaf_size: Self::DESIRED_LEAF_SIZE,
        }
    }

    /// Monoid with custom leaf sizes; requires `0 < desired <= max`.
    pub fn with_leaf_sizes(max: usize, desired: usize) -> Result<Self, LeafSizeError> {
        if desired == 0 {
            return Err(LeafSizeError::ZeroDesired);
        }
        if desired > max {
            return Err(LeafSizeError::DesiredExceedsMax { desired, max });
        }
        Ok(TokenMonoid {
            max_leaf_size: max,
            desired_leaf_size: desired,
        })
    }

    #[inline]
    pub fn desired_leaf_size(&self) -> usize {
        self.desired_leaf_size
    }
}

impl Default for TokenMonoid {
    fn default() -> Self {
        TokenMonoid::new()
    }
}

impl Monoid for TokenMonoid {
    type Leaf = TokenArray;

    fn metrics(&self) -> &[Metric] {
        &Self::METRICS
    }

    #[inline]
    fn max_leaf_size(&self) -> usize {
        self.max_leaf_size
    }

    fn measure(&self, leaf: &TokenArray) -> Metrics {
        let metric = leaf.measure();
        Metrics::from_values([
            leaf.token_count(),
            leaf.char_count() as usize,
            metric.restartable_state_count,
            metric.edit_count,
        ])
    }

    #[inline]
    fn leaf_size(&self, leaf: &TokenArray) -> usize {
        leaf.token_count()
    }

    fn merge(&self, left: &TokenArray, right: &TokenArray) -> TokenArray {
        left.concat(right)
    }

    fn split(&self, leaf: &TokenArray) -> Vec<TokenArray> {
        debug!(
            tokens = leaf.token_count(),
            desired = self.desired_leaf_size,
            "splitting token leaf"
        );
        leaf.split(self.desired_leaf_size)
    }
}
