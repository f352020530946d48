// src/scheduler.rs - Pending queue and scheduling passes
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;

use crate::events::{EventSink, FarmEvent};
use crate::farm::FarmState;
use crate::spool::FilamentType;
use crate::strategy::{PrintingStrategy, SwapError};
use crate::task::{PrintSpec, PrintTask};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("color {color} ({filament}) not found")]
    ColorNotAvailable {
        color: String,
        filament: FilamentType,
    },
    #[error("print '{name}' needs {expected} colors, got {got}")]
    ColorCountMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("print '{0}' not found")]
    UnknownPrint(String),
    #[error("no printer with id {0}")]
    UnknownPrinter(u32),
    #[error("printer {0} has no running task")]
    NoRunningTask(u32),
    #[error(transparent)]
    Swap(#[from] SwapError),
}

/// Owns the pending print-task queue and drives the active strategy over
/// idle printers.
pub struct PrintTaskHandler {
    pending: VecDeque<PrintTask>,
    strategy: Box<dyn PrintingStrategy>,
}

impl PrintTaskHandler {
    pub fn new(strategy: Box<dyn PrintingStrategy>) -> Self {
        Self {
            pending: VecDeque::new(),
            strategy,
        }
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn PrintingStrategy>) {
        tracing::info!(strategy = strategy.name(), "printing strategy changed");
        self.strategy = strategy;
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn pending_tasks(&self) -> impl Iterator<Item = &PrintTask> {
        self.pending.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Validate and enqueue a new task. The requested color count must match
    /// the spec's slot count and every color must exist somewhere in the
    /// farm for the stated filament type.
    pub fn enqueue(
        &mut self,
        spec: Arc<PrintSpec>,
        colors: Vec<String>,
        filament_type: FilamentType,
        state: &FarmState,
    ) -> Result<String, ScheduleError> {
        if colors.len() != spec.color_slots() {
            return Err(ScheduleError::ColorCountMismatch {
                name: spec.name.clone(),
                expected: spec.color_slots(),
                got: colors.len(),
            });
        }
        for color in &colors {
            if !state.arena.color_exists(color, filament_type) {
                return Err(ScheduleError::ColorNotAvailable {
                    color: color.clone(),
                    filament: filament_type,
                });
            }
        }
        let task = PrintTask::new(spec, colors, filament_type);
        tracing::info!(task = %task.spec().name, id = %task.id(), "print task queued");
        self.pending.push_back(task);
        Ok("Print task added to the queue".to_string())
    }

    /// Run the active strategy once for a single printer, if it is idle.
    pub fn schedule_printer(
        &mut self,
        printer_idx: usize,
        state: &mut FarmState,
        sink: &mut dyn EventSink,
    ) -> Result<Option<String>, ScheduleError> {
        if !state.printers[printer_idx].is_idle() {
            return Ok(None);
        }
        let trace = self
            .strategy
            .select_print_task(printer_idx, &mut self.pending, state, sink)?;
        Ok(trace.filter(|t| !t.is_empty()))
    }

    /// One pass over the fleet in order: every idle printer gets one chance
    /// to pick up work. Returns one trace block per printer that started a
    /// task. Printers left idle and tasks left pending are a normal outcome.
    pub fn run_scheduling_pass(
        &mut self,
        state: &mut FarmState,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<String>, ScheduleError> {
        let mut traces = Vec::new();
        for idx in 0..state.printers.len() {
            if let Some(trace) = self.schedule_printer(idx, state, sink)? {
                traces.push(trace);
            }
        }
        Ok(traces)
    }

    /// Detach a printer's running task. On failure the task goes to the back
    /// of the pending queue; on success a `TaskFulfilled` event is raised.
    /// Either way the filament used is consumed from the spools still loaded
    /// on the printer, one spool per color slot, stopping early when the
    /// printer holds fewer spools than the task has colors.
    pub fn finalize(
        &mut self,
        printer_id: u32,
        success: bool,
        state: &mut FarmState,
        sink: &mut dyn EventSink,
    ) -> Result<String, ScheduleError> {
        let printer_idx = state
            .printer_index(printer_id)
            .ok_or(ScheduleError::UnknownPrinter(printer_id))?;
        let task = state.printers[printer_idx]
            .detach_task()
            .ok_or(ScheduleError::NoRunningTask(printer_id))?;

        let loaded: Vec<_> = state.printers[printer_idx].loaded_spools().to_vec();
        let slots = loaded.len().min(task.colors().len());
        for i in 0..slots {
            let amount = task.spec().filament_per_color[i];
            if let Ok(spool) = state.arena.get_mut(loaded[i]) {
                if let Err(e) = spool.consume(amount) {
                    tracing::warn!(error = %e, "spool ran short while finishing task");
                }
            }
        }

        let printer_name = state.printers[printer_idx].name().to_string();
        let message = format!(
            "Task {} {} removed from printer {}",
            task.spec().name,
            task.filament_type(),
            printer_name
        );
        if success {
            tracing::info!(task = %task.spec().name, printer = %printer_name, "task fulfilled");
            sink.on_event(FarmEvent::TaskFulfilled);
        } else {
            tracing::warn!(task = %task.spec().name, printer = %printer_name, "task failed, requeued");
            self.pending.push_back(task);
        }
        Ok(message)
    }
}
