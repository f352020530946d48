// src/printer.rs - Printer model and eligibility predicates
use crate::spool::{FilamentType, SpoolId};
use crate::task::{PrintSpec, PrintTask};

/// Printer variant. Capacity and eligibility rules hang off this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterClass {
    /// Open build volume, one spool. Cannot run warp-prone ABS.
    Standard,
    /// Enclosed build volume, one spool. Enclosure permits ABS.
    Housed,
    /// Multiple spool slots. ABS is currently forbidden even when housed.
    MultiColor { max_colors: usize },
}

impl PrinterClass {
    /// How many spools this printer can hold at once.
    pub fn spool_capacity(&self) -> usize {
        match self {
            PrinterClass::Standard | PrinterClass::Housed => 1,
            PrinterClass::MultiColor { max_colors } => *max_colors,
        }
    }
}

#[derive(Debug)]
pub struct Printer {
    id: u32,
    name: String,
    manufacturer: String,
    class: PrinterClass,
    max_x: u32,
    max_y: u32,
    max_z: u32,
    loaded_spools: Vec<SpoolId>,
    current_task: Option<PrintTask>,
}

impl Printer {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        manufacturer: impl Into<String>,
        class: PrinterClass,
        max_x: u32,
        max_y: u32,
        max_z: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            manufacturer: manufacturer.into(),
            class,
            max_x,
            max_y,
            max_z,
            loaded_spools: Vec::new(),
            current_task: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn class(&self) -> PrinterClass {
        self.class
    }

    pub fn loaded_spools(&self) -> &[SpoolId] {
        &self.loaded_spools
    }

    pub(crate) fn loaded_spools_mut(&mut self) -> &mut Vec<SpoolId> {
        &mut self.loaded_spools
    }

    pub fn current_task(&self) -> Option<&PrintTask> {
        self.current_task.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.current_task.is_none()
    }

    pub(crate) fn assign_task(&mut self, task: PrintTask) {
        self.current_task = Some(task);
    }

    pub(crate) fn detach_task(&mut self) -> Option<PrintTask> {
        self.current_task.take()
    }

    /// Bounding-box check: the spec must fit inside the build volume.
    pub fn physical_fit(&self, spec: &PrintSpec) -> bool {
        spec.height <= self.max_z && spec.width <= self.max_x && spec.length <= self.max_y
    }

    /// Variant eligibility, independent of which spools would be used.
    pub fn eligible(&self, task: &PrintTask) -> bool {
        let colors = task.colors().len();
        match self.class {
            PrinterClass::Standard => task.filament_type() != FilamentType::Abs && colors == 1,
            PrinterClass::Housed => colors == 1,
            PrinterClass::MultiColor { max_colors } => {
                task.filament_type() != FilamentType::Abs && colors <= max_colors
            }
        }
    }
}
