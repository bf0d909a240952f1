//! Copy-on-write interning of token types into dense tag ids.
//!
//! Token types can be arbitrary values that are slow to compare or too large
//! to store per token. A [`TypeMap`] assigns each registered type a small id
//! that fits in [`TokenTag`]'s type-id bits.
//!
//! Snapshots are immutable and share their tables through `Arc`. A
//! [`TypeMapBuilder`] starts out sharing its parent's tables and copies them
//! on the first registration, so the parent snapshot and sibling builders
//! never observe its changes.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use super::{TokenTag, TypeMapError};

/// Forward and reverse tables; ids are `0..id_to_type.len()`.
#[derive(Clone)]
struct Tables<T> {
    id_to_type: Vec<T>,
    type_to_id: FxHashMap<T, u32>,
}

impl<T> Default for Tables<T> {
    fn default() -> Self {
        Tables {
            id_to_type: Vec::new(),
            type_to_id: FxHashMap::default(),
        }
    }
}

/// Immutable snapshot of a type-to-id interning table.
pub struct TypeMap<T> {
    tables: Arc<Tables<T>>,
}

impl<T: Eq + Hash + Clone> TypeMap<T> {
    /// An empty map; the first registered type gets id 0.
    pub fn new() -> Self {
        TypeMap {
            tables: Arc::new(Tables::default()),
        }
    }

    /// Number of registered types, which is also the next id to be assigned.
    #[inline]
    pub fn len(&self) -> usize {
        self.tables.id_to_type.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.id_to_type.is_empty()
    }

    pub fn try_get(&self, id: u32) -> Result<&T, TypeMapError> {
        self.tables
            .id_to_type
            .get(id as usize)
            .ok_or(TypeMapError::UnknownId {
                id,
                len: self.len(),
            })
    }

    /// The type registered under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never registered.
    pub fn get(&self, id: u32) -> &T {
        self.try_get(id).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Id of `ty`, if registered.
    pub fn id_of(&self, ty: &T) -> Option<u32> {
        self.tables.type_to_id.get(ty).copied()
    }

    /// A builder sharing this snapshot's tables until its first registration.
    pub fn builder(&self) -> TypeMapBuilder<T> {
        TypeMapBuilder {
            tables: Arc::clone(&self.tables),
            mapping_copied: false,
        }
    }
}

impl<T: Eq + Hash + Clone> Default for TypeMap<T> {
    fn default() -> Self {
        TypeMap::new()
    }
}

impl<T> Clone for TypeMap<T> {
    fn clone(&self) -> Self {
        TypeMap {
            tables: Arc::clone(&self.tables),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for TypeMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.tables.id_to_type.iter().enumerate())
            .finish()
    }
}

/// Mutable builder deriving a new [`TypeMap`] from an existing one.
///
/// Confined to one thread for one construction episode; turn it into a
/// snapshot with [`build`](Self::build).
pub struct TypeMapBuilder<T> {
    tables: Arc<Tables<T>>,
    /// Set once the tables have been copied out of the parent snapshot.
    mapping_copied: bool,
}

impl<T: Eq + Hash + Clone> TypeMapBuilder<T> {
    /// Whether this builder has copied its parent's tables yet.
    #[inline]
    pub fn mapping_copied(&self) -> bool {
        self.mapping_copied
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tables.id_to_type.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.id_to_type.is_empty()
    }

    /// Id of `ty`, registering it under the next free id if needed.
    ///
    /// Lookups of known types never copy the tables.
    pub fn try_type_id(&mut self, ty: &T) -> Result<u32, TypeMapError> {
        if let Some(&id) = self.tables.type_to_id.get(ty) {
            return Ok(id);
        }
        let id = u32::try_from(self.len())
            .ok()
            .filter(|&id| id <= TokenTag::MAX_TYPE_ID)
            .ok_or(TypeMapError::IdSpaceExhausted)?;

        let tables = self.tables_mut();
        tables.id_to_type.push(ty.clone());
        tables.type_to_id.insert(ty.clone(), id);
        Ok(id)
    }

    /// Id of `ty`, registering it under the next free id if needed.
    ///
    /// # Panics
    ///
    /// Panics if every id that fits in a [`TokenTag`] is taken.
    pub fn type_id(&mut self, ty: &T) -> u32 {
        self.try_type_id(ty).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Snapshot of the builder's current tables.
    pub fn build(self) -> TypeMap<T> {
        TypeMap {
            tables: self.tables,
        }
    }

    fn tables_mut(&mut self) -> &mut Tables<T> {
        if !self.mapping_copied {
            trace!(types = self.len(), "copying type map tables");
            self.tables = Arc::new(Tables::clone(&self.tables));
            self.mapping_copied = true;
        }
        // Uniquely owned once copied.
        Arc::make_mut(&mut self.tables)
    }
}

impl<T: fmt::Debug> fmt::Debug for TypeMapBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMapBuilder")
            .field("types", &self.tables.id_to_type)
            .field("mapping_copied", &self.mapping_copied)
            .finish()
    }
}

#[cfg(test)]
mod tests;
