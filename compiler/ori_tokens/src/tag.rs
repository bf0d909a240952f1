//! Packed per-token tag: type id plus restartable/edited flags.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Per-token flags stored in the two low bits of a [`TokenTag`].
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TokenFlags: u32 {
        /// Token was touched by the most recent edit.
        const EDITED = 1 << 0;
        /// The lexer can resume from the start of this token.
        const RESTARTABLE = 1 << 1;
    }
}

/// One token's type id and flags packed into a `u32`.
///
/// Layout:
///
/// | Bits  | Field         |
/// |-------|---------------|
/// | 2..32 | type id       |
/// | 1     | `RESTARTABLE` |
/// | 0     | `EDITED`      |
///
/// # Invariant
///
/// The type id is at most [`TokenTag::MAX_TYPE_ID`]. [`crate::TypeMapBuilder`]
/// refuses to hand out larger ids.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TokenTag(u32);

impl TokenTag {
    /// Number of low bits reserved for [`TokenFlags`].
    pub const FLAG_BITS: u32 = 2;

    /// Largest type id that fits next to the flags.
    pub const MAX_TYPE_ID: u32 = u32::MAX >> Self::FLAG_BITS;

    /// Pack a type id and flags.
    ///
    /// # Panics
    ///
    /// Panics if `type_id` exceeds [`TokenTag::MAX_TYPE_ID`].
    #[inline]
    pub const fn new(type_id: u32, restartable: bool, edited: bool) -> Self {
        let mut flags = TokenFlags::empty();
        if restartable {
            flags = flags.union(TokenFlags::RESTARTABLE);
        }
        if edited {
            flags = flags.union(TokenFlags::EDITED);
        }
        Self::from_parts(type_id, flags)
    }

    /// Pack a type id and an explicit flag set.
    ///
    /// # Panics
    ///
    /// Panics if `type_id` exceeds [`TokenTag::MAX_TYPE_ID`].
    #[inline]
    pub const fn from_parts(type_id: u32, flags: TokenFlags) -> Self {
        assert!(
            type_id <= Self::MAX_TYPE_ID,
            "type id does not fit in a token tag"
        );
        TokenTag((type_id << Self::FLAG_BITS) | flags.bits())
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        TokenTag(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn type_id(self) -> u32 {
        self.0 >> Self::FLAG_BITS
    }

    #[inline]
    pub const fn flags(self) -> TokenFlags {
        TokenFlags::from_bits_truncate(self.0)
    }

    #[inline]
    pub const fn is_restartable(self) -> bool {
        self.flags().contains(TokenFlags::RESTARTABLE)
    }

    #[inline]
    pub const fn is_edited(self) -> bool {
        self.flags().contains(TokenFlags::EDITED)
    }

    /// Same tag with the `EDITED` bit set to `edited`.
    #[inline]
    #[must_use]
    pub const fn with_edited(self, edited: bool) -> Self {
        if edited {
            TokenTag(self.0 | TokenFlags::EDITED.bits())
        } else {
            TokenTag(self.0 & !TokenFlags::EDITED.bits())
        }
    }
}

impl fmt::Debug for TokenTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenTag({}", self.type_id())?;
        if self.is_restartable() {
            write!(f, ", restartable")?;
        }
        if self.is_edited() {
            write!(f, ", edited")?;
        }
        write!(f, ")")
    }
}

// Compile-time assertion: TokenTag is exactly 4 bytes.
const _: () = assert!(size_of::<TokenTag>() == 4);
