// src/farm.rs - Farm state and the public facade
use std::sync::Arc;
use uuid::Uuid;

use crate::arena::{FreePool, SpoolArena};
use crate::events::Metrics;
use crate::printer::Printer;
use crate::scheduler::{PrintTaskHandler, ScheduleError};
use crate::spool::{FilamentType, Spool, SpoolId};
use crate::strategy::StrategyKind;
use crate::task::{PrintSpec, PrintTask};

/// Mutable shared state of the farm: every spool, the free pool, and the
/// printer fleet. Strategies and the scheduler operate on this as a unit so
/// the ownership invariants hold across one call.
#[derive(Debug, Default)]
pub struct FarmState {
    pub arena: SpoolArena,
    pub free_pool: FreePool,
    pub printers: Vec<Printer>,
}

impl FarmState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spool and place it in the free pool.
    pub fn add_free_spool(&mut self, spool: Spool) -> Result<(), crate::arena::ArenaError> {
        let id = self.arena.register(spool)?;
        self.free_pool.give(id)
    }

    pub fn printer_index(&self, printer_id: u32) -> Option<usize> {
        self.printers.iter().position(|p| p.id() == printer_id)
    }

    /// Number of printers currently running a task.
    pub fn running_count(&self) -> usize {
        self.printers.iter().filter(|p| !p.is_idle()).count()
    }
}

/// Read-only snapshot of one printer for callers of the facade.
#[derive(Debug, Clone)]
pub struct PrinterStatus {
    pub id: u32,
    pub name: String,
    pub idle: bool,
    pub loaded_spools: Vec<SpoolId>,
    pub current_task: Option<String>,
}

/// Read-only snapshot of one pending task.
#[derive(Debug, Clone)]
pub struct PendingTask {
    pub id: Uuid,
    pub print_name: String,
    pub filament_type: FilamentType,
    pub colors: Vec<String>,
}

impl PendingTask {
    fn from_task(task: &PrintTask) -> Self {
        Self {
            id: task.id(),
            print_name: task.spec().name.clone(),
            filament_type: task.filament_type(),
            colors: task.colors().to_vec(),
        }
    }
}

/// Facade over the engine: print-spec catalog, farm state, scheduler, and
/// metrics behind the operations the calling layer needs.
pub struct PrintFarm {
    specs: Vec<Arc<PrintSpec>>,
    state: FarmState,
    handler: PrintTaskHandler,
    metrics: Metrics,
}

impl PrintFarm {
    pub fn new(specs: Vec<Arc<PrintSpec>>, state: FarmState, strategy: StrategyKind) -> Self {
        Self {
            specs,
            state,
            handler: PrintTaskHandler::new(strategy.create()),
            metrics: Metrics::new(),
        }
    }

    pub fn specs(&self) -> &[Arc<PrintSpec>] {
        &self.specs
    }

    pub fn state(&self) -> &FarmState {
        &self.state
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn dashboard(&self) -> String {
        self.metrics.dashboard()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.handler.strategy_name()
    }

    pub fn available_strategies(&self) -> Vec<&'static str> {
        vec![
            StrategyKind::FewestSpoolChanges.display_name(),
            StrategyKind::SmallestSufficientSpool.display_name(),
        ]
    }

    /// Swap the active allocation policy. Running tasks are unaffected.
    pub fn set_strategy(&mut self, strategy: StrategyKind) {
        self.handler.set_strategy(strategy.create());
    }

    /// Distinct colors on hand for a filament type, for building requests.
    pub fn available_colors(&self, filament_type: FilamentType) -> Vec<String> {
        self.state.arena.available_colors(filament_type)
    }

    /// Queue a task for the named print. Fails when the print is unknown,
    /// the color count does not match the print's slots, or a color is not
    /// stocked in the stated material.
    pub fn enqueue(
        &mut self,
        print_name: &str,
        filament_type: FilamentType,
        colors: Vec<String>,
    ) -> Result<String, ScheduleError> {
        let spec = self
            .specs
            .iter()
            .find(|s| s.name == print_name)
            .cloned()
            .ok_or_else(|| ScheduleError::UnknownPrint(print_name.to_string()))?;
        self.handler
            .enqueue(spec, colors, filament_type, &self.state)
    }

    /// One scheduling pass over the whole fleet.
    pub fn run_scheduling_pass(&mut self) -> Result<Vec<String>, ScheduleError> {
        self.handler
            .run_scheduling_pass(&mut self.state, &mut self.metrics)
    }

    /// Report completion or failure of a printer's running task, then give
    /// that printer one immediate chance to pick up new work.
    pub fn finalize(&mut self, printer_id: u32, success: bool) -> Result<String, ScheduleError> {
        let mut trace = self
            .handler
            .finalize(printer_id, success, &mut self.state, &mut self.metrics)?;
        if let Some(idx) = self.state.printer_index(printer_id) {
            if let Some(next) =
                self.handler
                    .schedule_printer(idx, &mut self.state, &mut self.metrics)?
            {
                trace.push('\n');
                trace.push_str(&next);
            }
        }
        Ok(trace)
    }

    pub fn pending_tasks(&self) -> Vec<PendingTask> {
        self.handler.pending_tasks().map(PendingTask::from_task).collect()
    }

    pub fn pending_len(&self) -> usize {
        self.handler.pending_len()
    }

    pub fn running_count(&self) -> usize {
        self.state.running_count()
    }

    pub fn printer_statuses(&self) -> Vec<PrinterStatus> {
        self.state
            .printers
            .iter()
            .map(|p| PrinterStatus {
                id: p.id(),
                name: p.name().to_string(),
                idle: p.is_idle(),
                loaded_spools: p.loaded_spools().to_vec(),
                current_task: p.current_task().map(|t| t.spec().name.clone()),
            })
            .collect()
    }
}
