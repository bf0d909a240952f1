//! Contract violations reported by token storage.
//!
//! Every variant describes a caller bug or internal corruption. The `try_*`
//! APIs return them; the plain APIs panic with the same message.

use thiserror::Error;

use super::TokenTag;

/// Misuse or corruption of a [`crate::TokenArray`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenArrayError {
    #[error("token index {index} out of bounds (token count {count})")]
    IndexOutOfBounds { index: usize, count: usize },

    #[error("restartable state #{ordinal} not found: leaf has {count} restartable tokens")]
    RestartableStateNotFound { ordinal: usize, count: usize },

    #[error("edited token #{ordinal} not found: leaf has {count} edited tokens")]
    EditNotFound { ordinal: usize, count: usize },

    #[error("invalid token range {from}..{to} (token count {count})")]
    InvalidRange { from: usize, to: usize, count: usize },

    #[error("token of type {type_id} has zero length")]
    EmptyToken { type_id: u32 },

    #[error("token {index} ends at {end}, before the previous token's end {previous}")]
    UnorderedEnd { index: usize, previous: u32, end: u32 },

    #[error("type id {type_id} exceeds the token tag range (max {max})", max = TokenTag::MAX_TYPE_ID)]
    TypeIdOutOfRange { type_id: u32 },

    #[error("char offset {base} + {length} exceeds u32::MAX")]
    OffsetOverflow { base: u32, length: u32 },

    #[error("splice produced {actual} chars, expected {expected}")]
    CharCountMismatch { expected: u64, actual: u64 },
}

/// Misuse of a [`crate::TypeMap`] or [`crate::TypeMapBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeMapError {
    #[error("type id {id} is not registered (type map holds {len} types)")]
    UnknownId { id: u32, len: usize },

    #[error("type id space exhausted: cannot register more than {} types", u64::from(TokenTag::MAX_TYPE_ID) + 1)]
    IdSpaceExhausted,
}

/// Invalid leaf size configuration for [`crate::TokenMonoid`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeafSizeError {
    #[error("desired leaf size must be positive")]
    ZeroDesired,

    #[error("desired leaf size {desired} exceeds maximum leaf size {max}")]
    DesiredExceedsMax { desired: usize, max: usize },
}
