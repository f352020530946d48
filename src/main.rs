// src/main.rs - Headless driver: load the farm, replay a task file, report
use clap::Parser;
use serde::Deserialize;
use std::path::Path;

use printfarm::catalog::load_catalog;
use printfarm::config::load_config;
use printfarm::farm::PrintFarm;
use printfarm::spool::FilamentType;

#[derive(Parser, Debug)]
#[command(name = "printfarm", about = "3D-print farm scheduling simulator")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "printfarm.toml")]
    config: String,
    /// Override the print-spec catalog path
    #[arg(long)]
    prints: Option<String>,
    /// Override the spool catalog path
    #[arg(long)]
    spools: Option<String>,
    /// Override the printer catalog path
    #[arg(long)]
    printers: Option<String>,
    /// JSON file of tasks to enqueue and run to completion
    #[arg(long)]
    tasks: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskRequest {
    print: String,
    filament: FilamentType,
    colors: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    tracing::info!("Starting printfarm scheduling simulator");
    tracing::info!("Loading configuration from: {}", args.config);

    let mut config = load_config(&args.config).map_err(|e| {
        tracing::error!("Failed to load config from '{}': {}", args.config, e);
        e
    })?;
    if let Some(prints) = args.prints {
        config.data.prints = prints;
    }
    if let Some(spools) = args.spools {
        config.data.spools = spools;
    }
    if let Some(printers) = args.printers {
        config.data.printers = printers;
    }

    let catalog = load_catalog(
        Path::new(&config.data.prints),
        Path::new(&config.data.spools),
        Path::new(&config.data.printers),
    )?;
    let mut farm = PrintFarm::new(catalog.specs, catalog.state, config.strategy);

    tracing::info!("Strategy: {}", farm.strategy_name());
    for status in farm.printer_statuses() {
        tracing::info!("Printer {} ({}): idle", status.id, status.name);
    }
    tracing::info!(
        "Free spools: {}, print specs: {}",
        farm.state().free_pool.len(),
        farm.specs().len()
    );

    let Some(tasks_path) = args.tasks else {
        tracing::info!("No task file given, nothing to schedule");
        return Ok(());
    };

    let requests: Vec<TaskRequest> = serde_json::from_str(&std::fs::read_to_string(&tasks_path)?)?;
    for request in requests {
        match farm.enqueue(&request.print, request.filament, request.colors) {
            Ok(message) => tracing::info!("{}", message),
            Err(e) => tracing::warn!("Rejected task '{}': {}", request.print, e),
        }
    }

    // Drain the queue: one pass hands work to every idle printer, then each
    // completion reschedules that printer until nothing assignable is left.
    for trace in farm.run_scheduling_pass()? {
        println!("{trace}");
    }
    while farm.running_count() > 0 {
        let running: Vec<u32> = farm
            .printer_statuses()
            .iter()
            .filter(|s| !s.idle)
            .map(|s| s.id)
            .collect();
        for printer_id in running {
            println!("{}", farm.finalize(printer_id, true)?);
        }
    }

    if farm.pending_len() > 0 {
        tracing::warn!("{} task(s) could not be scheduled", farm.pending_len());
    }
    println!("{}", farm.dashboard());
    Ok(())
}
