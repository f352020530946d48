// src/events.rs - Farm events and the metrics sink
//
// The scheduler and strategies report spool changes and fulfilled tasks
// through an injected sink rather than registered observers, so tests can
// substitute a recording sink.

/// Something worth counting happened on the farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmEvent {
    /// One spool was physically placed into a printer.
    SpoolChange,
    /// A print task completed successfully.
    TaskFulfilled,
}

/// Receiver for farm events.
pub trait EventSink {
    fn on_event(&mut self, event: FarmEvent);
}

/// Process-wide counters. Incremented by events, never decremented.
#[derive(Debug, Default, Clone, Copy)]
pub struct Metrics {
    spool_change_count: u64,
    tasks_fulfilled: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spool_change_count(&self) -> u64 {
        self.spool_change_count
    }

    pub fn tasks_fulfilled(&self) -> u64 {
        self.tasks_fulfilled
    }

    /// Dashboard block in the shape the terminal view prints.
    pub fn dashboard(&self) -> String {
        format!(
            "==================== DASHBOARD ====================\n\
             Spool changes: {}\n\
             Prints fulfilled: {}\n\
             ===================================================",
            self.spool_change_count, self.tasks_fulfilled
        )
    }
}

impl EventSink for Metrics {
    fn on_event(&mut self, event: FarmEvent) {
        match event {
            FarmEvent::SpoolChange => self.spool_change_count += 1,
            FarmEvent::TaskFulfilled => self.tasks_fulfilled += 1,
        }
    }
}

/// Sink that remembers every event it saw. Test helper.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<FarmEvent>,
}

impl EventSink for RecordingSink {
    fn on_event(&mut self, event: FarmEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_accumulate() {
        let mut metrics = Metrics::new();
        metrics.on_event(FarmEvent::SpoolChange);
        metrics.on_event(FarmEvent::SpoolChange);
        metrics.on_event(FarmEvent::TaskFulfilled);
        assert_eq!(metrics.spool_change_count(), 2);
        assert_eq!(metrics.tasks_fulfilled(), 1);
    }

    #[test]
    fn test_dashboard_render() {
        let mut metrics = Metrics::new();
        metrics.on_event(FarmEvent::TaskFulfilled);
        let text = metrics.dashboard();
        assert!(text.contains("Spool changes: 0"));
        assert!(text.contains("Prints fulfilled: 1"));
    }
}
