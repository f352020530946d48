// Benchmark for a scheduling pass over a synthetic fleet
// Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};
use std::sync::Arc;

use printfarm::farm::{FarmState, PrintFarm};
use printfarm::printer::{Printer, PrinterClass};
use printfarm::spool::{FilamentType, Spool, SpoolId};
use printfarm::strategy::StrategyKind;
use printfarm::task::PrintSpec;

const COLORS: [&str; 5] = ["red", "blue", "green", "black", "white"];

fn build_farm(printers: u32, spools: u32, strategy: StrategyKind) -> PrintFarm {
    let mut state = FarmState::new();
    for id in 0..spools {
        let color = COLORS[(id as usize) % COLORS.len()];
        state
            .add_free_spool(Spool::new(
                SpoolId(id),
                color,
                FilamentType::Pla,
                100.0 + (id as f64 % 17.0) * 50.0,
            ))
            .unwrap();
    }
    for id in 0..printers {
        let class = match id % 3 {
            0 => PrinterClass::Standard,
            1 => PrinterClass::Housed,
            _ => PrinterClass::MultiColor { max_colors: 4 },
        };
        state.printers.push(Printer::new(
            id,
            format!("printer-{id}"),
            "Bench",
            class,
            220,
            220,
            250,
        ));
    }
    let spec = Arc::new(PrintSpec {
        name: "widget".into(),
        height: 40,
        width: 40,
        length: 40,
        filament_per_color: vec![25.0],
        print_time: 45,
    });
    PrintFarm::new(vec![spec], state, strategy)
}

fn bench_pass(c: &mut Criterion, label: &str, strategy: StrategyKind) {
    c.bench_function(label, |b| {
        b.iter(|| {
            let mut farm = build_farm(50, 500, strategy);
            for i in 0..200 {
                let color = COLORS[i % COLORS.len()];
                farm.enqueue("widget", FilamentType::Pla, vec![color.to_string()])
                    .unwrap();
            }
            let traces = farm.run_scheduling_pass().unwrap();
            assert!(!traces.is_empty());
        });
    });
}

fn bench_fewest_changes(c: &mut Criterion) {
    bench_pass(c, "pass 50 printers / 200 tasks (fewest changes)", StrategyKind::FewestSpoolChanges);
}

fn bench_smallest_spool(c: &mut Criterion) {
    bench_pass(
        c,
        "pass 50 printers / 200 tasks (smallest sufficient)",
        StrategyKind::SmallestSufficientSpool,
    );
}

criterion_group!(benches, bench_fewest_changes, bench_smallest_spool);
criterion_main!(benches);
