//! Serialized token leaves survive a round trip through the cache format,
//! and malformed cached leaves are rejected on load.

#![cfg(feature = "cache")]

use ori_tokens::{TokenArray, TokenTag};
use pretty_assertions::assert_eq;

#[test]
fn test_token_array_bincode_round_trip() {
    let mut builder = TokenArray::builder();
    builder.push(3, 4, true, false).push(7, 1, false, true);
    let tokens = builder.build();

    let bytes = bincode::serialize(&tokens).unwrap_or_else(|e| panic!("{e}"));
    let decoded: TokenArray = bincode::deserialize(&bytes).unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(decoded, tokens);
    assert_eq!(decoded.measure(), tokens.measure());
}

#[test]
fn test_tag_serializes_as_packed_bits() {
    let tag = TokenTag::new(5, true, true);

    let bytes = bincode::serialize(&tag).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(bytes, tag.bits().to_le_bytes().to_vec());
}

/// Encode raw `(end, tag bits)` pairs the way a cached leaf stores them.
fn raw_leaf(pairs: &[(u32, u32)]) -> Vec<u8> {
    bincode::serialize(&pairs.to_vec()).unwrap_or_else(|e| panic!("{e}"))
}

#[test]
fn test_raw_pairs_decode_like_built_leaf() {
    let word = TokenTag::new(1, true, false).bits();
    let space = TokenTag::new(2, false, false).bits();

    let decoded: TokenArray = bincode::deserialize(&raw_leaf(&[(3, word), (4, space)]))
        .unwrap_or_else(|e| panic!("{e}"));

    let mut builder = TokenArray::builder();
    builder.push(1, 3, true, false).push(2, 1, false, false);
    assert_eq!(decoded, builder.build());
}

#[test]
fn test_decreasing_ends_are_rejected() {
    let tag = TokenTag::new(1, false, false).bits();

    let err = bincode::deserialize::<TokenArray>(&raw_leaf(&[(5, tag), (3, tag)]))
        .err()
        .unwrap_or_else(|| panic!("decreasing ends decoded"));
    assert!(
        err.to_string()
            .contains("token 1 ends at 3, before the previous token's end 5"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_repeated_end_is_rejected() {
    let tag = TokenTag::new(4, false, false).bits();

    let err = bincode::deserialize::<TokenArray>(&raw_leaf(&[(2, tag), (2, tag)]))
        .err()
        .unwrap_or_else(|| panic!("zero-length token decoded"));
    assert!(
        err.to_string().contains("token of type 4 has zero length"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_leading_zero_end_is_rejected() {
    let tag = TokenTag::new(1, false, false).bits();

    assert!(bincode::deserialize::<TokenArray>(&raw_leaf(&[(0, tag)])).is_err());
}
