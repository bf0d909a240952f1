//! Ori Tokens - leaf storage for incrementally re-lexed token streams
//!
//! An editor keeps the lexer's output for a document in a rope of token
//! leaves so that edits only re-lex the neighborhood of the change. This
//! crate provides the leaf format and everything the rope needs to index it:
//!
//! - [`TokenTag`]: type id plus restartable/edited flags packed into a `u32`
//! - [`TokenArray`]: immutable leaf of `(end, tag)` pairs with splice support
//! - [`TypeMap`] / [`TypeMapBuilder`]: copy-on-write interning of token types
//! - [`TokenMonoid`]: measure/merge/split policy and the four sum metrics
//! - [`TokenCursor`]: rope cursor caching the current leaf's bounds
//!
//! # Index spaces
//!
//! Every token can be addressed four ways, one per [`TokenMonoid`] metric:
//! by token ordinal, by char offset, by restartable-state ordinal (the n-th
//! token the lexer can resume from) and by edit ordinal (the n-th token
//! touched by the most recent edit). Leaves store offsets relative to their
//! own start; the rope's running sums turn them into global positions.

mod array;
mod cursor;
mod error;
mod monoid;
mod tag;
mod type_map;

pub use array::{TokenArray, TokenArrayBuilder, TokenArrayMetric, TokenInfo};
pub use cursor::TokenCursor;
pub use error::{LeafSizeError, TokenArrayError, TypeMapError};
pub use monoid::TokenMonoid;
pub use tag::{TokenFlags, TokenTag};
pub use type_map::{TypeMap, TypeMapBuilder};
