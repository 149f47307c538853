//! The tick owner: scans, conditions, aggregates and dispatches.

use padctl_traits::{AnalogScan, ContinuousSink, ControllerSnapshot, DigitalScan, EventSink};
use tracing::warn;

use crate::aggregate::aggregate;
use crate::conditioner::Conditioner;
use crate::config::{ChannelCfg, LineCfg};
use crate::digital::DigitalSampler;
use crate::dispatch::DispatchEngine;
use crate::hw_error::map_hw_error;
use crate::status::TickReport;

/// Generic, statically dispatched controller.
///
/// Owns all per-channel and baseline state; `tick()` runs to completion
/// without blocking beyond scan latency.
pub struct Controller<A, D, C, E> {
    pub(crate) analog_scan: A,
    pub(crate) digital_scan: D,
    pub(crate) continuous: C,
    pub(crate) events: E,
    pub(crate) inputs: Vec<usize>,
    pub(crate) conditioner: Conditioner,
    pub(crate) sampler: DigitalSampler,
    pub(crate) engine: DispatchEngine,
    pub(crate) burst: Vec<u16>,
    pub(crate) ticks: u64,
    pub(crate) last_snapshot: Option<ControllerSnapshot>,
}

impl<A, D, C, E> core::fmt::Debug for Controller<A, D, C, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("channels", &self.inputs.len())
            .field("lines", &self.sampler.width())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl<A, D, C, E> Controller<A, D, C, E>
where
    A: AnalogScan,
    D: DigitalScan,
    C: ContinuousSink,
    E: EventSink,
{
    pub(crate) fn from_parts(
        analog_scan: A,
        digital_scan: D,
        continuous: C,
        events: E,
        channels: &[ChannelCfg],
        lines: Vec<LineCfg>,
    ) -> Self {
        let max_burst = channels
            .iter()
            .map(|c| c.conditioner.oversample)
            .max()
            .unwrap_or(0);
        let width = lines.len();
        Self {
            analog_scan,
            digital_scan,
            continuous,
            events,
            inputs: channels.iter().map(|c| c.input).collect(),
            conditioner: Conditioner::new(channels.iter().map(|c| c.conditioner)),
            sampler: DigitalSampler::new(lines),
            engine: DispatchEngine::new(channels.iter().map(|c| c.param_id).collect(), width),
            burst: Vec::with_capacity(max_burst),
            ticks: 0,
            last_snapshot: None,
        }
    }

    /// Run one tick: scan every line and channel, build the snapshot and
    /// hand it to the dispatch engine.
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        let tick = self.ticks;
        let mut failures = 0;

        for (i, &input) in self.inputs.iter().enumerate() {
            let Some(ch) = self.conditioner.channel(i) else {
                continue;
            };
            let k = ch.cfg().oversample;
            self.burst.clear();
            let mut last_err = None;
            for _ in 0..k {
                match self.analog_scan.scan_analog(input) {
                    Ok(raw) => self.burst.push(raw),
                    Err(e) => last_err = Some(e),
                }
            }
            if let Some(e) = last_err {
                let missed = k - self.burst.len();
                failures += missed;
                let err = map_hw_error(e.as_ref());
                if self.burst.is_empty() {
                    warn!(tick, channel = i, input, error = %err, "analog burst failed; keeping previous value");
                } else {
                    warn!(tick, channel = i, input, missed, error = %err, "analog burst incomplete");
                }
            }
            self.conditioner.process(i, &self.burst);
        }

        let (digital, digital_failures) = self.sampler.sample(&mut self.digital_scan);
        failures += digital_failures;

        let snapshot = aggregate(digital, &self.conditioner.outputs())
            .with_unseeded(self.conditioner.unseeded_mask());
        let mut report =
            self.engine
                .dispatch(tick, &snapshot, &mut self.continuous, &mut self.events);
        report.scan_failures = failures;
        self.last_snapshot = Some(snapshot);
        report
    }
}

impl<A, D, C, E> Controller<A, D, C, E> {
    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_snapshot(&self) -> Option<&ControllerSnapshot> {
        self.last_snapshot.as_ref()
    }

    pub fn conditioner(&self) -> &Conditioner {
        &self.conditioner
    }

    pub fn engine(&self) -> &DispatchEngine {
        &self.engine
    }

    pub fn lines(&self) -> &[LineCfg] {
        self.sampler.lines()
    }

    pub fn continuous(&self) -> &C {
        &self.continuous
    }

    pub fn continuous_mut(&mut self) -> &mut C {
        &mut self.continuous
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }
}
