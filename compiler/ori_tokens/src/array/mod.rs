//! Immutable leaf payload: a flat sequence of `(end, tag)` pairs.
//!
//! Offsets are leaf-local char offsets. Token `i` spans `start(i)..end(i)`,
//! where `start(0) == 0` and `start(i) == end(i - 1)`. Ends are strictly
//! increasing, so every token is non-empty and offset lookups can binary
//! search.

mod builder;

pub use builder::TokenArrayBuilder;

use std::fmt;

use tracing::trace;

use super::{TokenArrayError, TokenFlags, TokenTag};

/// One stored pair: absolute (leaf-local) end offset and packed tag.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
struct TokenEntry {
    end: u32,
    tag: TokenTag,
}

impl TokenEntry {
    #[inline]
    fn offset_by(self, base: u32) -> Result<Self, TokenArrayError> {
        let end = self
            .end
            .checked_add(base)
            .ok_or(TokenArrayError::OffsetOverflow {
                base,
                length: self.end,
            })?;
        Ok(TokenEntry { end, tag: self.tag })
    }
}

// Compile-time assertion: a stored token is two packed u32s.
const _: () = assert!(size_of::<TokenEntry>() == 8);

/// Decoded view of one token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenInfo {
    pub type_id: u32,
    pub start: u32,
    pub end: u32,
    pub restartable: bool,
    pub edited: bool,
}

impl TokenInfo {
    #[inline]
    pub fn length(&self) -> u32 {
        self.end - self.start
    }
}

/// Aggregate flag counts of one [`TokenArray`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenArrayMetric {
    pub restartable_state_count: usize,
    pub edit_count: usize,
}

/// Immutable token leaf.
///
/// Every transforming operation ([`concat`](Self::concat),
/// [`split`](Self::split), [`replace_tokens`](Self::replace_tokens),
/// [`clear_edited`](Self::clear_edited)) returns a new array.
///
/// Positional accessors panic on an out-of-range index instead of reading
/// past the stored pairs.
///
/// With the `cache` feature, deserialization re-validates the stored pairs
/// and rejects arrays whose ends are not strictly increasing.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize))]
pub struct TokenArray {
    entries: Vec<TokenEntry>,
}

impl TokenArray {
    /// An array with no tokens.
    #[inline]
    pub fn empty() -> Self {
        TokenArray {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn builder() -> TokenArrayBuilder {
        TokenArrayBuilder::new()
    }

    #[inline]
    pub fn token_count(&self) -> usize {
        self.entries.len()
    }

    /// End offset of the last token, or 0 when empty.
    #[inline]
    pub fn char_count(&self) -> u32 {
        self.entries.last().map_or(0, |entry| entry.end)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild an array from raw stored pairs, checking every invariant the
    /// builder enforces.
    #[cfg(feature = "cache")]
    fn try_from_entries(entries: Vec<TokenEntry>) -> Result<Self, TokenArrayError> {
        let mut builder = TokenArrayBuilder::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let previous = builder.char_count();
            let length = entry
                .end
                .checked_sub(previous)
                .ok_or(TokenArrayError::UnorderedEnd {
                    index,
                    previous,
                    end: entry.end,
                })?;
            builder.try_push(
                entry.tag.type_id(),
                length,
                entry.tag.is_restartable(),
                entry.tag.is_edited(),
            )?;
        }
        Ok(builder.build())
    }

    #[inline]
    fn try_entry(&self, index: usize) -> Result<&TokenEntry, TokenArrayError> {
        self.entries
            .get(index)
            .ok_or(TokenArrayError::IndexOutOfBounds {
                index,
                count: self.entries.len(),
            })
    }

    #[inline]
    fn entry(&self, index: usize) -> &TokenEntry {
        self.try_entry(index).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Start of token `index`, or `char_count` when `index == token_count`.
    #[inline]
    fn boundary(&self, index: usize) -> u32 {
        if index == 0 {
            0
        } else {
            self.entries[index - 1].end
        }
    }

    #[inline]
    pub fn tag(&self, index: usize) -> TokenTag {
        self.entry(index).tag
    }

    #[inline]
    pub fn type_id(&self, index: usize) -> u32 {
        self.entry(index).tag.type_id()
    }

    #[inline]
    pub fn start(&self, index: usize) -> u32 {
        self.try_entry(index)
            .map(|_| self.boundary(index))
            .unwrap_or_else(|e| panic!("{e}"))
    }

    #[inline]
    pub fn end(&self, index: usize) -> u32 {
        self.entry(index).end
    }

    #[inline]
    pub fn length(&self, index: usize) -> u32 {
        self.end(index) - self.boundary(index)
    }

    #[inline]
    pub fn is_restartable(&self, index: usize) -> bool {
        self.entry(index).tag.is_restartable()
    }

    #[inline]
    pub fn is_edited(&self, index: usize) -> bool {
        self.entry(index).tag.is_edited()
    }

    pub fn try_token(&self, index: usize) -> Result<TokenInfo, TokenArrayError> {
        let entry = self.try_entry(index)?;
        Ok(TokenInfo {
            type_id: entry.tag.type_id(),
            start: self.boundary(index),
            end: entry.end,
            restartable: entry.tag.is_restartable(),
            edited: entry.tag.is_edited(),
        })
    }

    pub fn token(&self, index: usize) -> TokenInfo {
        self.try_token(index).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Iterate over decoded tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = TokenInfo> + '_ {
        let mut start = 0;
        self.entries.iter().map(move |entry| {
            let info = TokenInfo {
                type_id: entry.tag.type_id(),
                start,
                end: entry.end,
                restartable: entry.tag.is_restartable(),
                edited: entry.tag.is_edited(),
            };
            start = entry.end;
            info
        })
    }

    /// Index of the token whose `start..end` range contains `offset`.
    ///
    /// Offsets at or past `char_count` clamp to the last token rather than
    /// failing.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn index_by_offset(&self, offset: u32) -> usize {
        assert!(
            !self.entries.is_empty(),
            "index_by_offset({offset}) on an empty token array"
        );
        let index = self.entries.partition_point(|entry| entry.end <= offset);
        index.min(self.entries.len() - 1)
    }

    /// Index of the `ordinal`-th (0-based) token carrying `flag`.
    fn nth_flagged(&self, flag: TokenFlags, ordinal: usize) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.tag.flags().contains(flag))
            .nth(ordinal)
            .map(|(index, _)| index)
    }

    /// Number of tokens carrying `flag` in `entries[..index]`.
    fn count_flagged(&self, flag: TokenFlags, index: usize) -> usize {
        assert!(
            index <= self.entries.len(),
            "token index {index} out of bounds (token count {})",
            self.entries.len()
        );
        self.entries[..index]
            .iter()
            .filter(|entry| entry.tag.flags().contains(flag))
            .count()
    }

    pub fn try_index_at_restartable_state_index(
        &self,
        ordinal: usize,
    ) -> Result<usize, TokenArrayError> {
        self.nth_flagged(TokenFlags::RESTARTABLE, ordinal)
            .ok_or_else(|| TokenArrayError::RestartableStateNotFound {
                ordinal,
                count: self.count_flagged(TokenFlags::RESTARTABLE, self.entries.len()),
            })
    }

    /// Index of the `ordinal`-th (0-based) restartable token.
    ///
    /// # Panics
    ///
    /// Panics if the leaf holds `ordinal` or fewer restartable tokens.
    pub fn index_at_restartable_state_index(&self, ordinal: usize) -> usize {
        self.try_index_at_restartable_state_index(ordinal)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Number of restartable tokens strictly before `index` (`index <= token_count`).
    pub fn restartable_state_count_before(&self, index: usize) -> usize {
        self.count_flagged(TokenFlags::RESTARTABLE, index)
    }

    pub fn try_index_at_edit_index(&self, ordinal: usize) -> Result<usize, TokenArrayError> {
        self.nth_flagged(TokenFlags::EDITED, ordinal)
            .ok_or_else(|| TokenArrayError::EditNotFound {
                ordinal,
                count: self.count_flagged(TokenFlags::EDITED, self.entries.len()),
            })
    }

    /// Index of the `ordinal`-th (0-based) edited token.
    ///
    /// # Panics
    ///
    /// Panics if the leaf holds `ordinal` or fewer edited tokens.
    pub fn index_at_edit_index(&self, ordinal: usize) -> usize {
        self.try_index_at_edit_index(ordinal)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Number of edited tokens strictly before `index` (`index <= token_count`).
    pub fn edit_count_before(&self, index: usize) -> usize {
        self.count_flagged(TokenFlags::EDITED, index)
    }

    pub fn measure(&self) -> TokenArrayMetric {
        let mut metric = TokenArrayMetric::default();
        for entry in &self.entries {
            if entry.tag.is_restartable() {
                metric.restartable_state_count += 1;
            }
            if entry.tag.is_edited() {
                metric.edit_count += 1;
            }
        }
        metric
    }

    /// `self` followed by `rhs`, with `rhs`'s offsets moved past `self`.
    ///
    /// # Panics
    ///
    /// Panics if the combined char count overflows `u32`.
    #[must_use]
    pub fn concat(&self, rhs: &TokenArray) -> TokenArray {
        if self.is_empty() {
            return rhs.clone();
        }
        if rhs.is_empty() {
            return self.clone();
        }
        let base = self.char_count();
        let mut entries = Vec::with_capacity(self.entries.len() + rhs.entries.len());
        entries.extend_from_slice(&self.entries);
        for entry in &rhs.entries {
            entries.push(entry.offset_by(base).unwrap_or_else(|e| panic!("{e}")));
        }
        TokenArray { entries }
    }

    /// Partition into consecutive chunks of at most `chunk_size` tokens.
    ///
    /// Every chunk is rebased to start at offset 0. An array with fewer than
    /// `chunk_size` tokens comes back as a single chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn split(&self, chunk_size: usize) -> Vec<TokenArray> {
        assert!(chunk_size > 0, "token array chunk size must be positive");
        if self.entries.len() < chunk_size {
            return vec![self.clone()];
        }
        trace!(
            tokens = self.entries.len(),
            chunk_size, "splitting token array"
        );
        let mut base = 0;
        self.entries
            .chunks(chunk_size)
            .map(|chunk| {
                let entries = chunk
                    .iter()
                    .map(|entry| TokenEntry {
                        end: entry.end - base,
                        tag: entry.tag,
                    })
                    .collect();
                base = chunk.last().map_or(base, |entry| entry.end);
                TokenArray { entries }
            })
            .collect()
    }

    /// Replace tokens `from..to` with `tokens`, whose offsets are zero-based.
    ///
    /// Inserted tokens are moved to start where token `from` started; the
    /// tail after `to` is shifted so it starts where the inserted tokens end.
    #[tracing::instrument(level = "trace", skip_all, fields(from = from, to = to, inserted = tokens.token_count()))]
    pub fn try_replace_tokens(
        &self,
        from: usize,
        to: usize,
        tokens: &TokenArray,
    ) -> Result<TokenArray, TokenArrayError> {
        let count = self.entries.len();
        if from > to || to > count {
            return Err(TokenArrayError::InvalidRange { from, to, count });
        }

        let from_start = self.boundary(from);
        let to_start = self.boundary(to);
        let inserted_end =
            from_start
                .checked_add(tokens.char_count())
                .ok_or(TokenArrayError::OffsetOverflow {
                    base: from_start,
                    length: tokens.char_count(),
                })?;

        let mut entries = Vec::with_capacity(count - (to - from) + tokens.token_count());
        entries.extend_from_slice(&self.entries[..from]);
        for entry in &tokens.entries {
            entries.push(entry.offset_by(from_start)?);
        }
        for entry in &self.entries[to..] {
            let rebased = TokenEntry {
                end: entry.end - to_start,
                tag: entry.tag,
            };
            entries.push(rebased.offset_by(inserted_end)?);
        }
        let result = TokenArray { entries };

        let expected = u64::from(self.char_count()) - u64::from(to_start - from_start)
            + u64::from(tokens.char_count());
        let actual = u64::from(result.char_count());
        if actual != expected {
            return Err(TokenArrayError::CharCountMismatch { expected, actual });
        }
        trace!(
            removed = to - from,
            chars = result.char_count(),
            "spliced token array"
        );
        Ok(result)
    }

    /// Panicking form of [`try_replace_tokens`](Self::try_replace_tokens).
    ///
    /// # Panics
    ///
    /// Panics on an invalid range or if the result's char count disagrees
    /// with the replaced and inserted lengths.
    #[must_use]
    pub fn replace_tokens(&self, from: usize, to: usize, tokens: &TokenArray) -> TokenArray {
        self.try_replace_tokens(from, to, tokens)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Copy of this array with every `EDITED` bit cleared.
    #[must_use]
    pub fn clear_edited(&self) -> TokenArray {
        TokenArray {
            entries: self
                .entries
                .iter()
                .map(|entry| TokenEntry {
                    end: entry.end,
                    tag: entry.tag.with_edited(false),
                })
                .collect(),
        }
    }
}

#[cfg(feature = "cache")]
impl<'de> serde::Deserialize<'de> for TokenArray {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(rename = "TokenArray")]
        struct Stored {
            entries: Vec<TokenEntry>,
        }

        let stored = Stored::deserialize(deserializer)?;
        TokenArray::try_from_entries(stored.entries).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for TokenArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
