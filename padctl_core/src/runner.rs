//! Fixed-cadence tick loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use padctl_traits::{AnalogScan, Clock, ContinuousSink, DigitalScan, EventSink, SendOutcome};

use crate::controller::Controller;
use crate::status::TickReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    pub period: Duration,
    /// Stop after this many ticks; `None` runs until shutdown.
    pub max_ticks: Option<u64>,
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    pub events_emitted: u64,
    pub events_deferred: u64,
    pub continuous_skipped: u64,
    pub scan_failures: u64,
    /// Ticks whose own duration reached the period.
    pub overruns: u64,
    pub max_tick: Duration,
}

impl RunStats {
    pub fn record(&mut self, report: &TickReport, took: Duration) {
        self.ticks += 1;
        self.events_emitted += report.emitted.len() as u64;
        self.events_deferred += report.deferred as u64;
        if report.continuous == SendOutcome::Skipped {
            self.continuous_skipped += 1;
        }
        self.scan_failures += report.scan_failures as u64;
        self.max_tick = self.max_tick.max(took);
    }
}

/// Tick `controller` every `params.period` until `shutdown` is set or the
/// tick limit is reached. Sleeps `period - tick duration`, never negative.
pub fn run<A, D, C, E>(
    controller: &mut Controller<A, D, C, E>,
    clock: &dyn Clock,
    params: &RunParams,
    shutdown: &AtomicBool,
) -> RunStats
where
    A: AnalogScan,
    D: DigitalScan,
    C: ContinuousSink,
    E: EventSink,
{
    let mut stats = RunStats::default();
    let period_ms = params.period.as_millis() as u64;
    tracing::info!(period_ms, max_ticks = ?params.max_ticks, "run start");

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        if params.max_ticks.is_some_and(|max| stats.ticks >= max) {
            break;
        }
        let started = clock.now();
        let report = controller.tick();
        let took = clock.now().saturating_duration_since(started);
        stats.record(&report, took);

        match params.period.checked_sub(took) {
            Some(rest) if !rest.is_zero() => clock.sleep(rest),
            _ => {
                stats.overruns += 1;
                tracing::debug!(
                    tick = report.tick,
                    took_us = took.as_micros() as u64,
                    "tick overran period"
                );
            }
        }
    }

    tracing::info!(
        ticks = stats.ticks,
        events = stats.events_emitted,
        deferred = stats.events_deferred,
        overruns = stats.overruns,
        "run stop"
    );
    stats
}
