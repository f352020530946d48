// src/catalog.rs - JSON catalog loading and entity resolution
//
// The engine consumes fully-typed entities; this module is the boundary
// collaborator that turns the three JSON catalog files (print specs, spools,
// printers) into them. Printer records resolve to their class here: an entry
// with more than one spool slot becomes MultiColor, a housed single-slot
// entry becomes Housed, anything else Standard.
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::arena::ArenaError;
use crate::farm::FarmState;
use crate::printer::{Printer, PrinterClass};
use crate::spool::{FilamentType, Spool, SpoolId};
use crate::task::PrintSpec;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parse error in '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Arena(#[from] ArenaError),
}

#[derive(Debug, Deserialize)]
struct SpoolRecord {
    id: u32,
    color: String,
    #[serde(rename = "filamentType")]
    filament_type: FilamentType,
    length: f64,
}

#[derive(Debug, Deserialize)]
struct PrinterRecord {
    id: u32,
    name: String,
    manufacturer: String,
    #[serde(default)]
    housed: bool,
    #[serde(rename = "maxX")]
    max_x: u32,
    #[serde(rename = "maxY")]
    max_y: u32,
    #[serde(rename = "maxZ")]
    max_z: u32,
    #[serde(rename = "maxColors", default)]
    max_colors: Option<usize>,
}

impl PrinterRecord {
    fn resolve_class(&self) -> PrinterClass {
        match self.max_colors {
            Some(max_colors) if max_colors > 1 => PrinterClass::MultiColor { max_colors },
            _ if self.housed => PrinterClass::Housed,
            _ => PrinterClass::Standard,
        }
    }
}

/// Everything loaded from disk: the spec catalog plus initial farm state
/// (all spools free, all printers idle).
pub struct Catalog {
    pub specs: Vec<Arc<PrintSpec>>,
    pub state: FarmState,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CatalogError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Load and resolve the three catalog files.
pub fn load_catalog(
    prints_path: &Path,
    spools_path: &Path,
    printers_path: &Path,
) -> Result<Catalog, CatalogError> {
    let specs: Vec<PrintSpec> = read_json(prints_path)?;
    let spool_records: Vec<SpoolRecord> = read_json(spools_path)?;
    let printer_records: Vec<PrinterRecord> = read_json(printers_path)?;

    let mut state = FarmState::new();
    for record in spool_records {
        state.add_free_spool(Spool::new(
            SpoolId(record.id),
            record.color,
            record.filament_type,
            record.length,
        ))?;
    }
    for record in printer_records {
        let class = record.resolve_class();
        state.printers.push(Printer::new(
            record.id,
            record.name,
            record.manufacturer,
            class,
            record.max_x,
            record.max_y,
            record.max_z,
        ));
    }

    tracing::info!(
        prints = specs.len(),
        spools = state.arena.len(),
        printers = state.printers.len(),
        "catalog loaded"
    );
    Ok(Catalog {
        specs: specs.into_iter().map(Arc::new).collect(),
        state,
    })
}
