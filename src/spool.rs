// src/spool.rs - Filament spools and filament types
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpoolError {
    #[error("spool {id}: requested {requested} mm but only {remaining} mm remaining")]
    InsufficientFilament {
        id: SpoolId,
        requested: f64,
        remaining: f64,
    },
    #[error("consume amount must be non-negative, got {0}")]
    NegativeAmount(f64),
}

/// Filament material. ABS needs an enclosed build volume to avoid warping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilamentType {
    Pla,
    Petg,
    Abs,
}

impl fmt::Display for FilamentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilamentType::Pla => "PLA",
            FilamentType::Petg => "PETG",
            FilamentType::Abs => "ABS",
        };
        write!(f, "{s}")
    }
}

impl FilamentType {
    /// Menu-style numeric code: 1 = PLA, 2 = PETG, 3 = ABS.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(FilamentType::Pla),
            2 => Some(FilamentType::Petg),
            3 => Some(FilamentType::Abs),
            _ => None,
        }
    }
}

/// Identifier of a physical spool in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SpoolId(pub u32);

impl fmt::Display for SpoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical roll of filament. Owned by the arena; the free pool and the
/// printers refer to it by id only.
#[derive(Debug, Clone)]
pub struct Spool {
    id: SpoolId,
    color: String,
    filament_type: FilamentType,
    remaining_length: f64,
}

impl Spool {
    pub fn new(id: SpoolId, color: impl Into<String>, filament_type: FilamentType, length: f64) -> Self {
        Self {
            id,
            color: color.into(),
            filament_type,
            remaining_length: length,
        }
    }

    pub fn id(&self) -> SpoolId {
        self.id
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn filament_type(&self) -> FilamentType {
        self.filament_type
    }

    pub fn remaining_length(&self) -> f64 {
        self.remaining_length
    }

    /// True if this spool carries the given color in the given material.
    pub fn matches(&self, color: &str, filament_type: FilamentType) -> bool {
        self.color == color && self.filament_type == filament_type
    }

    /// Deduct `amount` mm of filament. On insufficient filament the spool is
    /// left unchanged.
    pub fn consume(&mut self, amount: f64) -> Result<(), SpoolError> {
        if amount < 0.0 {
            return Err(SpoolError::NegativeAmount(amount));
        }
        if amount > self.remaining_length {
            return Err(SpoolError::InsufficientFilament {
                id: self.id,
                requested: amount,
                remaining: self.remaining_length,
            });
        }
        self.remaining_length -= amount;
        Ok(())
    }
}
