// src/arena.rs - Spool registry and free pool
//
// All spools live in the arena, keyed by id. The free pool and each
// printer's loaded set are ordered id lists; moving an id between them is
// the ownership transfer. A spool id must appear in exactly one of those
// sets at any time.
use std::collections::HashMap;
use thiserror::Error;

use crate::spool::{FilamentType, Spool, SpoolId};

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("spool {0} is not registered")]
    UnknownSpool(SpoolId),
    #[error("spool {0} is already registered")]
    DuplicateSpool(SpoolId),
    #[error("spool {0} is not in the free pool")]
    NotFree(SpoolId),
    #[error("spool {0} is already in the free pool")]
    AlreadyFree(SpoolId),
}

/// Registry of every spool known to the farm.
#[derive(Debug, Default)]
pub struct SpoolArena {
    spools: HashMap<SpoolId, Spool>,
}

impl SpoolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spool: Spool) -> Result<SpoolId, ArenaError> {
        let id = spool.id();
        if self.spools.contains_key(&id) {
            return Err(ArenaError::DuplicateSpool(id));
        }
        self.spools.insert(id, spool);
        Ok(id)
    }

    pub fn get(&self, id: SpoolId) -> Result<&Spool, ArenaError> {
        self.spools.get(&id).ok_or(ArenaError::UnknownSpool(id))
    }

    pub fn get_mut(&mut self, id: SpoolId) -> Result<&mut Spool, ArenaError> {
        self.spools.get_mut(&id).ok_or(ArenaError::UnknownSpool(id))
    }

    pub fn len(&self) -> usize {
        self.spools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spool> {
        self.spools.values()
    }

    /// Distinct colors available for a filament type anywhere in the farm,
    /// in ascending spool-id order so callers see a stable listing.
    pub fn available_colors(&self, filament_type: FilamentType) -> Vec<String> {
        let mut ids: Vec<SpoolId> = self.spools.keys().copied().collect();
        ids.sort();
        let mut colors: Vec<String> = Vec::new();
        for id in ids {
            let spool = &self.spools[&id];
            if spool.filament_type() == filament_type && !colors.iter().any(|c| c == spool.color()) {
                colors.push(spool.color().to_string());
            }
        }
        colors
    }

    /// True if any spool in the farm carries this color in this material.
    pub fn color_exists(&self, color: &str, filament_type: FilamentType) -> bool {
        self.spools.values().any(|s| s.matches(color, filament_type))
    }
}

/// Ordered set of spool ids not loaded on any printer. Iteration order is
/// insertion order; first-fit selection depends on it.
#[derive(Debug, Default)]
pub struct FreePool {
    ids: Vec<SpoolId>,
}

impl FreePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: SpoolId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[SpoolId] {
        &self.ids
    }

    /// Remove a spool from the pool, transferring ownership to the caller.
    pub fn take(&mut self, id: SpoolId) -> Result<SpoolId, ArenaError> {
        let pos = self
            .ids
            .iter()
            .position(|&s| s == id)
            .ok_or(ArenaError::NotFree(id))?;
        Ok(self.ids.remove(pos))
    }

    /// Return a spool to the pool. Rejects ids already present so a spool
    /// can never be owned twice.
    pub fn give(&mut self, id: SpoolId) -> Result<(), ArenaError> {
        if self.contains(id) {
            return Err(ArenaError::AlreadyFree(id));
        }
        self.ids.push(id);
        Ok(())
    }

    /// First spool in pool order satisfying the predicate.
    pub fn find_first(&self, arena: &SpoolArena, mut pred: impl FnMut(&Spool) -> bool) -> Option<SpoolId> {
        self.ids
            .iter()
            .copied()
            .find(|&id| arena.get(id).map(|s| pred(s)).unwrap_or(false))
    }
}
