// src/strategy/mod.rs - Allocation strategies and the spool swap executor
mod fewest_changes;
mod smallest_spool;

pub use fewest_changes::FewestSpoolChanges;
pub use smallest_spool::SmallestSufficientSpool;

use serde::Deserialize;
use std::collections::VecDeque;
use thiserror::Error;

use crate::arena::{ArenaError, FreePool, SpoolArena};
use crate::events::{EventSink, FarmEvent};
use crate::farm::FarmState;
use crate::spool::SpoolId;
use crate::task::PrintTask;

#[derive(Debug, Error)]
pub enum SwapError {
    #[error(transparent)]
    Arena(#[from] ArenaError),
    #[error("printer {printer} cannot hold {count} spools (capacity {capacity})")]
    CapacityExceeded {
        printer: String,
        count: usize,
        capacity: usize,
    },
}

/// Policy deciding which pending task an idle printer should run next and
/// which spools to load for it.
///
/// A successful selection removes the task from `pending`, assigns it to the
/// printer, performs any spool swap, and returns the combined trace. When no
/// feasible task exists the queue, the printer, and the pool are untouched
/// and `Ok(None)` is returned.
pub trait PrintingStrategy {
    fn name(&self) -> &'static str;

    fn select_print_task(
        &self,
        printer_idx: usize,
        pending: &mut VecDeque<PrintTask>,
        state: &mut FarmState,
        sink: &mut dyn EventSink,
    ) -> Result<Option<String>, SwapError>;
}

/// Strategy selector used by the config file and `set_strategy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    FewestSpoolChanges,
    SmallestSufficientSpool,
}

impl StrategyKind {
    pub fn create(self) -> Box<dyn PrintingStrategy> {
        match self {
            StrategyKind::FewestSpoolChanges => Box::new(FewestSpoolChanges),
            StrategyKind::SmallestSufficientSpool => Box::new(SmallestSufficientSpool),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StrategyKind::FewestSpoolChanges => "Fewest spool changes",
            StrategyKind::SmallestSufficientSpool => "Smallest sufficient spool",
        }
    }
}

/// Positional match of a loaded spool set against a task: the set must cover
/// every color slot and slot `i` must carry `colors[i]` in the task's
/// material.
pub fn spool_set_matches(arena: &SpoolArena, loaded: &[SpoolId], task: &PrintTask) -> bool {
    if loaded.len() < task.colors().len() {
        return false;
    }
    task.colors().iter().enumerate().all(|(i, color)| {
        arena
            .get(loaded[i])
            .map(|s| s.matches(color, task.filament_type()))
            .unwrap_or(false)
    })
}

/// First-fit assembly of a full spool set from the free pool, one spool per
/// color slot, never picking the same spool twice. Returns `None` when any
/// slot cannot be filled.
pub fn assemble_from_free(
    arena: &SpoolArena,
    free_pool: &FreePool,
    task: &PrintTask,
) -> Option<Vec<SpoolId>> {
    let mut chosen: Vec<SpoolId> = Vec::with_capacity(task.colors().len());
    for color in task.colors() {
        let next = free_pool.find_first(arena, |s| {
            s.matches(color, task.filament_type()) && !chosen.contains(&s.id())
        })?;
        chosen.push(next);
    }
    Some(chosen)
}

/// Exchange a printer's loaded spools for `new_spools`.
///
/// Current spools go back to the free pool first, then every new spool is
/// taken from it, so a spool the printer already held may reappear in the new
/// set. One trace line and one `SpoolChange` event are emitted per spool that
/// was not loaded before the swap.
pub fn swap_spools(
    printer_idx: usize,
    new_spools: Vec<SpoolId>,
    state: &mut FarmState,
    sink: &mut dyn EventSink,
) -> Result<Vec<String>, SwapError> {
    let printer = &state.printers[printer_idx];
    let capacity = printer.class().spool_capacity();
    if new_spools.len() > capacity {
        return Err(SwapError::CapacityExceeded {
            printer: printer.name().to_string(),
            count: new_spools.len(),
            capacity,
        });
    }

    let previous: Vec<SpoolId> = state.printers[printer_idx].loaded_spools().to_vec();
    for &id in &previous {
        state.free_pool.give(id)?;
    }
    for &id in &new_spools {
        state.free_pool.take(id)?;
    }

    let multi_slot = capacity > 1;
    let printer_name = state.printers[printer_idx].name().to_string();
    let mut messages = Vec::new();
    for (slot, &id) in new_spools.iter().enumerate() {
        if previous.contains(&id) {
            continue;
        }
        let mut message = format!(
            "- Spool change: Please place spool {id} in printer {printer_name}"
        );
        if multi_slot {
            message.push_str(&format!(" position {}", slot + 1));
        }
        tracing::debug!(printer = %printer_name, spool = %id, slot, "spool placed");
        messages.push(message);
        sink.on_event(FarmEvent::SpoolChange);
    }

    *state.printers[printer_idx].loaded_spools_mut() = new_spools;
    Ok(messages)
}

/// Single-spool form of [`swap_spools`].
pub fn swap_spool(
    printer_idx: usize,
    new_spool: SpoolId,
    state: &mut FarmState,
    sink: &mut dyn EventSink,
) -> Result<Vec<String>, SwapError> {
    swap_spools(printer_idx, vec![new_spool], state, sink)
}

/// Trace line appended after a task is assigned.
pub(crate) fn started_message(task: &PrintTask, printer_name: &str) -> String {
    format!(
        "- Started task: {} {} on printer {}",
        task.spec().name,
        task.filament_type(),
        printer_name
    )
}
