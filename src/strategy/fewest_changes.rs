// src/strategy/fewest_changes.rs - Keep current spools loaded when possible
use std::collections::VecDeque;

use crate::events::EventSink;
use crate::farm::FarmState;
use crate::spool::SpoolId;
use crate::task::PrintTask;

use super::{
    PrintingStrategy, SwapError, assemble_from_free, spool_set_matches, started_message,
    swap_spools,
};

/// Prefers tasks the printer can run with its currently loaded spools; only
/// when none qualifies does it assemble a fresh set from the free pool
/// (first-fit per color slot).
pub struct FewestSpoolChanges;

impl FewestSpoolChanges {
    /// First pending task runnable on the spools already in the printer.
    fn find_task_for_current_spools(
        &self,
        printer_idx: usize,
        pending: &VecDeque<PrintTask>,
        state: &FarmState,
    ) -> Option<usize> {
        let printer = &state.printers[printer_idx];
        if printer.loaded_spools().is_empty() {
            return None;
        }
        pending.iter().position(|task| {
            printer.physical_fit(task.spec())
                && printer.eligible(task)
                && spool_set_matches(&state.arena, printer.loaded_spools(), task)
        })
    }

    /// First pending task for which a complete spool set exists in the free
    /// pool, together with that set.
    fn find_task_for_free_spools(
        &self,
        printer_idx: usize,
        pending: &VecDeque<PrintTask>,
        state: &FarmState,
    ) -> Option<(usize, Vec<SpoolId>)> {
        let printer = &state.printers[printer_idx];
        for (idx, task) in pending.iter().enumerate() {
            if !printer.physical_fit(task.spec()) || !printer.eligible(task) {
                continue;
            }
            if let Some(spools) = assemble_from_free(&state.arena, &state.free_pool, task) {
                return Some((idx, spools));
            }
        }
        None
    }
}

impl PrintingStrategy for FewestSpoolChanges {
    fn name(&self) -> &'static str {
        "fewest-spool-changes"
    }

    fn select_print_task(
        &self,
        printer_idx: usize,
        pending: &mut VecDeque<PrintTask>,
        state: &mut FarmState,
        sink: &mut dyn EventSink,
    ) -> Result<Option<String>, SwapError> {
        let mut messages = Vec::new();

        let chosen = match self.find_task_for_current_spools(printer_idx, pending, state) {
            Some(idx) => Some(idx),
            None => match self.find_task_for_free_spools(printer_idx, pending, state) {
                Some((idx, spools)) => {
                    messages.extend(swap_spools(printer_idx, spools, state, sink)?);
                    Some(idx)
                }
                None => None,
            },
        };

        let Some(idx) = chosen else {
            return Ok(None);
        };
        let Some(task) = pending.remove(idx) else {
            return Ok(None);
        };

        let printer_name = state.printers[printer_idx].name().to_string();
        tracing::info!(
            printer = %printer_name,
            task = %task.spec().name,
            filament = %task.filament_type(),
            "task assigned (fewest spool changes)"
        );
        messages.push(started_message(&task, &printer_name));
        state.printers[printer_idx].assign_task(task);
        Ok(Some(messages.join("\n")))
    }
}
