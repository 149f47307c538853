//! Per-tick outcome returned from `Controller::tick`.

use padctl_traits::{DiscreteEvent, SendOutcome};

/// What happened during one tick. Never an error: sink unavailability
/// and scan failures are reported here and retried next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// 1-based tick counter.
    pub tick: u64,
    pub continuous: SendOutcome,
    /// Events accepted by the event sink, in channel order.
    pub emitted: Vec<DiscreteEvent>,
    /// Channels with a pending change that could not be delivered.
    pub deferred: usize,
    /// Failed scan reads (analog samples plus digital lines).
    pub scan_failures: usize,
}

impl TickReport {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            continuous: SendOutcome::Skipped,
            emitted: Vec::new(),
            deferred: 0,
            scan_failures: 0,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.emitted.is_empty() && self.deferred == 0
    }
}
