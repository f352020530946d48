// src/strategy/smallest_spool.rs - Minimize wasted remaining filament
use std::collections::VecDeque;

use crate::events::EventSink;
use crate::farm::FarmState;
use crate::spool::SpoolId;
use crate::task::PrintTask;

use super::{PrintingStrategy, SwapError, started_message, swap_spools};

/// Picks, per color slot, the spool with the least remaining filament that
/// still covers the slot's requirement. Spools already loaded on the printer
/// are preferred over pulling from the free pool, so a sufficient loaded
/// spool is reused instead of replaced.
pub struct SmallestSufficientSpool;

impl SmallestSufficientSpool {
    /// One spool per color slot, or `None` when some slot cannot be covered.
    fn choose_spools(
        &self,
        printer_idx: usize,
        task: &PrintTask,
        state: &FarmState,
    ) -> Option<Vec<SpoolId>> {
        let printer = &state.printers[printer_idx];
        let required = &task.spec().filament_per_color;
        let mut chosen: Vec<SpoolId> = Vec::with_capacity(task.colors().len());

        for (slot, color) in task.colors().iter().enumerate() {
            let need = required.get(slot).copied().unwrap_or(0.0);

            let reused = printer.loaded_spools().iter().copied().find(|&id| {
                !chosen.contains(&id)
                    && state
                        .arena
                        .get(id)
                        .map(|s| s.matches(color, task.filament_type()) && s.remaining_length() >= need)
                        .unwrap_or(false)
            });
            if let Some(id) = reused {
                chosen.push(id);
                continue;
            }

            let smallest = state
                .free_pool
                .ids()
                .iter()
                .copied()
                .filter(|id| !chosen.contains(id))
                .filter_map(|id| state.arena.get(id).ok())
                .filter(|s| s.matches(color, task.filament_type()) && s.remaining_length() >= need)
                .min_by(|a, b| a.remaining_length().total_cmp(&b.remaining_length()))
                .map(|s| s.id())?;
            chosen.push(smallest);
        }
        Some(chosen)
    }
}

impl PrintingStrategy for SmallestSufficientSpool {
    fn name(&self) -> &'static str {
        "smallest-sufficient-spool"
    }

    fn select_print_task(
        &self,
        printer_idx: usize,
        pending: &mut VecDeque<PrintTask>,
        state: &mut FarmState,
        sink: &mut dyn EventSink,
    ) -> Result<Option<String>, SwapError> {
        let mut selection: Option<(usize, Vec<SpoolId>)> = None;
        for (idx, task) in pending.iter().enumerate() {
            let printer = &state.printers[printer_idx];
            if !printer.physical_fit(task.spec()) || !printer.eligible(task) {
                continue;
            }
            if let Some(spools) = self.choose_spools(printer_idx, task, state) {
                selection = Some((idx, spools));
                break;
            }
        }

        let Some((idx, spools)) = selection else {
            return Ok(None);
        };
        let mut messages = Vec::new();
        if spools != state.printers[printer_idx].loaded_spools() {
            messages.extend(swap_spools(printer_idx, spools, state, sink)?);
        }

        let Some(task) = pending.remove(idx) else {
            return Ok(None);
        };
        let printer_name = state.printers[printer_idx].name().to_string();
        tracing::info!(
            printer = %printer_name,
            task = %task.spec().name,
            filament = %task.filament_type(),
            "task assigned (smallest sufficient spool)"
        );
        messages.push(started_message(&task, &printer_name));
        state.printers[printer_idx].assign_task(task);
        Ok(Some(messages.join("\n")))
    }
}
