// printfarm: task-assignment and spool-allocation engine for a simulated
// 3D-print farm.

pub mod arena;
pub mod catalog;
pub mod config;
pub mod events;
pub mod farm;
pub mod printer;
pub mod scheduler;
pub mod spool;
pub mod strategy;
pub mod task;

pub use arena::{FreePool, SpoolArena};
pub use events::{EventSink, FarmEvent, Metrics, RecordingSink};
pub use farm::{FarmState, PendingTask, PrintFarm, PrinterStatus};
pub use printer::{Printer, PrinterClass};
pub use scheduler::{PrintTaskHandler, ScheduleError};
pub use spool::{FilamentType, Spool, SpoolId};
pub use strategy::{FewestSpoolChanges, PrintingStrategy, SmallestSufficientSpool, StrategyKind};
pub use task::{PrintSpec, PrintTask};
