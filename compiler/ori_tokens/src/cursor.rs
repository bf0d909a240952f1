//! Leaf-scoped token cursor with cached coordinate bounds.
//!
//! Incremental re-lexing issues many nearby lookups in a row. Caching the
//! current leaf's token-ordinal and char-offset ranges lets those lookups
//! skip the rope descent entirely when they land in the same leaf.

use ori_rope::{Metric, RopeCursor};
use tracing::trace;

use super::{TokenArray, TokenMonoid};

/// A rope cursor over [`TokenArray`] leaves plus the current leaf's bounds.
///
/// Bounds are half-open global ranges, recomputed whenever the cursor is
/// built around a new underlying position.
#[derive(Clone, Debug)]
pub struct TokenCursor<C> {
    cursor: C,
    start_token_index: usize,
    end_token_index: usize,
    start_offset: usize,
    end_offset: usize,
}

impl<C: RopeCursor<Leaf = TokenArray>> TokenCursor<C> {
    pub fn new(cursor: C) -> Self {
        let start_token_index = cursor.location(TokenMonoid::TOKEN_COUNT);
        let start_offset = cursor.location(TokenMonoid::CHAR_COUNT);
        TokenCursor {
            start_token_index,
            end_token_index: start_token_index + cursor.size(TokenMonoid::TOKEN_COUNT),
            start_offset,
            end_offset: start_offset + cursor.size(TokenMonoid::CHAR_COUNT),
            cursor,
        }
    }

    /// The current leaf.
    #[inline]
    pub fn leaf(&self) -> &TokenArray {
        self.cursor.element()
    }

    #[inline]
    pub fn inner(&self) -> &C {
        &self.cursor
    }

    pub fn into_inner(self) -> C {
        self.cursor
    }

    #[inline]
    pub fn start_token_index(&self) -> usize {
        self.start_token_index
    }

    #[inline]
    pub fn end_token_index(&self) -> usize {
        self.end_token_index
    }

    #[inline]
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    #[inline]
    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    /// Global restartable-state ordinal of the leaf's first token.
    #[inline]
    pub fn restartable_state_base(&self) -> usize {
        self.cursor.location(TokenMonoid::RESTARTABLE_STATE_COUNT)
    }

    /// Global edited-token ordinal of the leaf's first token.
    #[inline]
    pub fn edit_base(&self) -> usize {
        self.cursor.location(TokenMonoid::EDIT_COUNT)
    }

    /// Whether `value` under `metric` falls inside the cached bounds.
    ///
    /// Only token count and char count are cached; other metrics never hit.
    pub fn contains(&self, metric: Metric, value: usize) -> bool {
        if metric == TokenMonoid::TOKEN_COUNT {
            (self.start_token_index..self.end_token_index).contains(&value)
        } else if metric == TokenMonoid::CHAR_COUNT {
            (self.start_offset..self.end_offset).contains(&value)
        } else {
            false
        }
    }

    /// Cursor on the next leaf, or `None` past the last leaf.
    pub fn next(&self, owner: &C::Owner) -> Option<Self> {
        self.cursor.next(owner).map(TokenCursor::new)
    }

    /// Cursor on the leaf containing `value` under `metric`.
    ///
    /// Returns `self` untouched when the cached bounds already contain
    /// `value` or when the rope resolves to the same position.
    #[must_use]
    pub fn scan(self, owner: &C::Owner, metric: Metric, value: usize) -> Self {
        if self.contains(metric, value) {
            return self;
        }
        let scanned = self.cursor.scan(owner, metric, value);
        if scanned.same_position(&self.cursor) {
            trace!(?metric, value, "token cursor scan stayed on current leaf");
            return self;
        }
        trace!(?metric, value, "token cursor moved to another leaf");
        TokenCursor::new(scanned)
    }

    /// Leaf-local index of global token index `global`.
    ///
    /// # Panics
    ///
    /// Panics if `global` is outside the current leaf.
    pub fn local_token_index(&self, global: usize) -> usize {
        assert!(
            (self.start_token_index..self.end_token_index).contains(&global),
            "token {global} is outside the current leaf ({}..{})",
            self.start_token_index,
            self.end_token_index
        );
        global - self.start_token_index
    }

    /// Global token index of leaf-local index `local`.
    ///
    /// # Panics
    ///
    /// Panics if `local` is not a token of the current leaf.
    pub fn global_token_index(&self, local: usize) -> usize {
        assert!(
            local < self.end_token_index - self.start_token_index,
            "local token {local} out of bounds (leaf holds {} tokens)",
            self.end_token_index - self.start_token_index
        );
        self.start_token_index + local
    }

    /// Global index of the token containing global char `offset`.
    ///
    /// Offsets past the end of the leaf clamp to its last token.
    ///
    /// # Panics
    ///
    /// Panics if `offset` lies before the current leaf or the leaf is empty.
    pub fn token_index_at_offset(&self, offset: usize) -> usize {
        assert!(
            offset >= self.start_offset,
            "offset {offset} lies before the current leaf (starts at {})",
            self.start_offset
        );
        let local = u32::try_from(offset - self.start_offset).unwrap_or(u32::MAX);
        self.start_token_index + self.leaf().index_by_offset(local)
    }

    /// Move to the leaf holding the `ordinal`-th restartable token and
    /// return its global token index alongside the moved cursor.
    ///
    /// # Panics
    ///
    /// Panics if the rope holds `ordinal` or fewer restartable tokens.
    pub fn index_at_restartable_state(self, owner: &C::Owner, ordinal: usize) -> (Self, usize) {
        let cursor = self.scan(owner, TokenMonoid::RESTARTABLE_STATE_COUNT, ordinal);
        let local_ordinal = ordinal
            .checked_sub(cursor.restartable_state_base())
            .unwrap_or_else(|| {
                panic!("restartable state #{ordinal} precedes the leaf found by scan")
            });
        let local = cursor.leaf().index_at_restartable_state_index(local_ordinal);
        let global = cursor.start_token_index + local;
        (cursor, global)
    }
}
