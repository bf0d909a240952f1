//! Append-only construction of [`TokenArray`]s.

use super::{TokenArray, TokenArrayError, TokenEntry, TokenTag};

/// Builds a [`TokenArray`] from token lengths, tracking the running offset.
#[derive(Clone, Debug, Default)]
pub struct TokenArrayBuilder {
    entries: Vec<TokenEntry>,
    char_count: u32,
}

impl TokenArrayBuilder {
    #[inline]
    pub fn new() -> Self {
        TokenArrayBuilder::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        TokenArrayBuilder {
            entries: Vec::with_capacity(capacity),
            char_count: 0,
        }
    }

    /// Append a token of `length` chars after the previous one.
    pub fn try_push(
        &mut self,
        type_id: u32,
        length: u32,
        restartable: bool,
        edited: bool,
    ) -> Result<&mut Self, TokenArrayError> {
        if length == 0 {
            return Err(TokenArrayError::EmptyToken { type_id });
        }
        if type_id > TokenTag::MAX_TYPE_ID {
            return Err(TokenArrayError::TypeIdOutOfRange { type_id });
        }
        let end = self
            .char_count
            .checked_add(length)
            .ok_or(TokenArrayError::OffsetOverflow {
                base: self.char_count,
                length,
            })?;
        self.entries.push(TokenEntry {
            end,
            tag: TokenTag::new(type_id, restartable, edited),
        });
        self.char_count = end;
        Ok(self)
    }

    /// Append a token of `length` chars after the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero, `type_id` does not fit in a [`TokenTag`],
    /// or the running char count overflows `u32`.
    pub fn push(&mut self, type_id: u32, length: u32, restartable: bool, edited: bool) -> &mut Self {
        self.try_push(type_id, length, restartable, edited)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    #[inline]
    pub fn token_count(&self) -> usize {
        self.entries.len()
    }

    /// Running length of the tokens pushed so far.
    #[inline]
    pub fn char_count(&self) -> u32 {
        self.char_count
    }

    pub fn build(self) -> TokenArray {
        TokenArray {
            entries: self.entries,
        }
    }
}
