use std::sync::Arc;

use printfarm::farm::{FarmState, PrintFarm};
use printfarm::printer::{Printer, PrinterClass};
use printfarm::scheduler::ScheduleError;
use printfarm::spool::{FilamentType, Spool, SpoolId};
use printfarm::strategy::StrategyKind;
use printfarm::task::PrintSpec;

fn cube_spec() -> Arc<PrintSpec> {
    Arc::new(PrintSpec {
        name: "cube".into(),
        height: 50,
        width: 50,
        length: 50,
        filament_per_color: vec![20.0],
        print_time: 120,
    })
}

fn single_printer_farm() -> PrintFarm {
    let mut state = FarmState::new();
    state
        .add_free_spool(Spool::new(SpoolId(1), "red", FilamentType::Pla, 500.0))
        .unwrap();
    state.printers.push(Printer::new(
        7,
        "Ender",
        "Creality",
        PrinterClass::Standard,
        200,
        200,
        200,
    ));
    PrintFarm::new(vec![cube_spec()], state, StrategyKind::FewestSpoolChanges)
}

#[test]
fn test_single_printer_scenario() {
    let mut farm = single_printer_farm();
    farm.enqueue("cube", FilamentType::Pla, vec!["red".into()]).unwrap();
    assert_eq!(farm.pending_len(), 1);

    let traces = farm.run_scheduling_pass().unwrap();
    assert_eq!(traces.len(), 1);
    assert!(traces[0].contains("place spool 1 in printer Ender"));
    assert!(traces[0].contains("Started task: cube PLA on printer Ender"));
    assert_eq!(farm.metrics().spool_change_count(), 1);
    assert_eq!(farm.pending_len(), 0);
    assert_eq!(farm.running_count(), 1);

    let trace = farm.finalize(7, true).unwrap();
    assert!(trace.contains("Task cube PLA removed from printer Ender"));
    assert_eq!(farm.metrics().tasks_fulfilled(), 1);
    assert_eq!(
        farm.state().arena.get(SpoolId(1)).unwrap().remaining_length(),
        480.0
    );
    assert_eq!(farm.running_count(), 0);
}

#[test]
fn test_failed_task_requeued_once() {
    let mut farm = single_printer_farm();
    farm.enqueue("cube", FilamentType::Pla, vec!["red".into()]).unwrap();
    farm.run_scheduling_pass().unwrap();
    assert_eq!(farm.pending_len(), 0);

    // finalize(false) requeues; the immediate reschedule picks it right back up
    let trace = farm.finalize(7, false).unwrap();
    assert!(trace.contains("removed from printer Ender"));
    assert!(trace.contains("Started task: cube"));
    assert_eq!(farm.pending_len(), 0);
    assert_eq!(farm.running_count(), 1);
    assert_eq!(farm.metrics().tasks_fulfilled(), 0);
    // filament was still consumed for the failed attempt
    assert_eq!(
        farm.state().arena.get(SpoolId(1)).unwrap().remaining_length(),
        480.0
    );
}

#[test]
fn test_abs_never_assigned_to_standard_printer() {
    let mut state = FarmState::new();
    state
        .add_free_spool(Spool::new(SpoolId(1), "red", FilamentType::Abs, 500.0))
        .unwrap();
    state.printers.push(Printer::new(
        1,
        "Open",
        "Acme",
        PrinterClass::Standard,
        200,
        200,
        200,
    ));
    let spec = Arc::new(PrintSpec {
        name: "cube".into(),
        height: 50,
        width: 50,
        length: 50,
        filament_per_color: vec![20.0],
        print_time: 120,
    });
    let mut farm = PrintFarm::new(vec![spec], state, StrategyKind::FewestSpoolChanges);
    farm.enqueue("cube", FilamentType::Abs, vec!["red".into()]).unwrap();

    let traces = farm.run_scheduling_pass().unwrap();
    assert!(traces.is_empty());
    assert_eq!(farm.pending_len(), 1);
    assert!(farm.printer_statuses()[0].idle);
}

#[test]
fn test_spool_ownership_is_exclusive() {
    let mut state = FarmState::new();
    for id in 1..=4u32 {
        state
            .add_free_spool(Spool::new(SpoolId(id), "red", FilamentType::Pla, 500.0))
            .unwrap();
    }
    for id in 1..=2u32 {
        state.printers.push(Printer::new(
            id,
            format!("P{id}"),
            "Acme",
            PrinterClass::Standard,
            200,
            200,
            200,
        ));
    }
    let mut farm = PrintFarm::new(vec![cube_spec()], state, StrategyKind::FewestSpoolChanges);
    for _ in 0..2 {
        farm.enqueue("cube", FilamentType::Pla, vec!["red".into()]).unwrap();
    }
    farm.run_scheduling_pass().unwrap();
    farm.finalize(1, true).unwrap();

    let state = farm.state();
    let mut seen: Vec<SpoolId> = state.free_pool.ids().to_vec();
    for printer in &state.printers {
        seen.extend_from_slice(printer.loaded_spools());
    }
    seen.sort();
    let total = seen.len();
    seen.dedup();
    assert_eq!(total, seen.len(), "a spool appeared in two owners");
    assert_eq!(total, state.arena.len());
}

#[test]
fn test_enqueue_validation() {
    let mut farm = single_printer_farm();

    let err = farm
        .enqueue("sphere", FilamentType::Pla, vec!["red".into()])
        .unwrap_err();
    assert!(matches!(err, ScheduleError::UnknownPrint(_)));

    let err = farm
        .enqueue("cube", FilamentType::Pla, vec!["red".into(), "blue".into()])
        .unwrap_err();
    assert!(matches!(err, ScheduleError::ColorCountMismatch { .. }));

    // red exists only as PLA
    let err = farm
        .enqueue("cube", FilamentType::Petg, vec!["red".into()])
        .unwrap_err();
    assert!(matches!(err, ScheduleError::ColorNotAvailable { .. }));

    assert_eq!(farm.pending_len(), 0);
}

#[test]
fn test_finalize_contract_breaches() {
    let mut farm = single_printer_farm();
    let err = farm.finalize(99, true).unwrap_err();
    assert!(matches!(err, ScheduleError::UnknownPrinter(99)));

    let err = farm.finalize(7, true).unwrap_err();
    assert!(matches!(err, ScheduleError::NoRunningTask(7)));
}

#[test]
fn test_set_strategy_keeps_running_tasks() {
    let mut farm = single_printer_farm();
    farm.enqueue("cube", FilamentType::Pla, vec!["red".into()]).unwrap();
    farm.run_scheduling_pass().unwrap();
    assert_eq!(farm.running_count(), 1);

    farm.set_strategy(StrategyKind::SmallestSufficientSpool);
    assert_eq!(farm.strategy_name(), "smallest-sufficient-spool");
    assert_eq!(farm.running_count(), 1);
}

#[test]
fn test_pending_queue_snapshot() {
    let mut farm = single_printer_farm();
    farm.enqueue("cube", FilamentType::Pla, vec!["red".into()]).unwrap();
    let pending = farm.pending_tasks();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].print_name, "cube");
    assert_eq!(pending[0].filament_type, FilamentType::Pla);
    assert_eq!(pending[0].colors, vec!["red".to_string()]);
}

#[test]
fn test_available_colors_query() {
    let farm = single_printer_farm();
    assert_eq!(farm.available_colors(FilamentType::Pla), vec!["red"]);
    assert!(farm.available_colors(FilamentType::Abs).is_empty());
}

#[test]
fn test_insufficient_filament_logged_not_fatal() {
    // spool holds less than the task needs; finalize still succeeds and the
    // spool keeps its remaining length
    let mut state = FarmState::new();
    state
        .add_free_spool(Spool::new(SpoolId(1), "red", FilamentType::Pla, 10.0))
        .unwrap();
    state.printers.push(Printer::new(
        7,
        "Ender",
        "Creality",
        PrinterClass::Standard,
        200,
        200,
        200,
    ));
    let mut farm = PrintFarm::new(vec![cube_spec()], state, StrategyKind::FewestSpoolChanges);
    farm.enqueue("cube", FilamentType::Pla, vec!["red".into()]).unwrap();
    farm.run_scheduling_pass().unwrap();
    farm.finalize(7, true).unwrap();
    assert_eq!(
        farm.state().arena.get(SpoolId(1)).unwrap().remaining_length(),
        10.0
    );
    assert_eq!(farm.metrics().tasks_fulfilled(), 1);
}
