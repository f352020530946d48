// src/task.rs - Print specifications and queued print tasks
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::spool::FilamentType;

/// Immutable description of a printable model, loaded once from the catalog.
/// `filament_per_color` has one entry per color slot the print needs.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintSpec {
    pub name: String,
    pub height: u32,
    pub width: u32,
    pub length: u32,
    #[serde(rename = "filamentLength")]
    pub filament_per_color: Vec<f64>,
    #[serde(rename = "printTime", default)]
    pub print_time: u32,
}

impl PrintSpec {
    /// Number of distinct color slots this print requires.
    pub fn color_slots(&self) -> usize {
        self.filament_per_color.len()
    }
}

/// One queued request to produce a print. Lives in the pending queue or on
/// exactly one printer, never both.
#[derive(Debug, Clone)]
pub struct PrintTask {
    id: Uuid,
    spec: Arc<PrintSpec>,
    colors: Vec<String>,
    filament_type: FilamentType,
}

impl PrintTask {
    pub fn new(spec: Arc<PrintSpec>, colors: Vec<String>, filament_type: FilamentType) -> Self {
        Self {
            id: Uuid::new_v4(),
            spec,
            colors,
            filament_type,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn spec(&self) -> &PrintSpec {
        &self.spec
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn filament_type(&self) -> FilamentType {
        self.filament_type
    }
}
