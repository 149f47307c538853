//! Change-gated dispatch of snapshots to the two sinks.
//!
//! The continuous sink gets every snapshot while it is ready. The event sink
//! gets one event per channel whose candidate differs from the last value it
//! accepted. The baseline only moves on `Accepted`, so anything the sinks
//! could not take is retried on the next tick with the then-current value.

use padctl_traits::{
    ContinuousSink, ControllerSnapshot, DigitalSnapshot, DiscreteEvent, EventSink, SendOutcome,
};
use tracing::{debug, info, warn};

use crate::status::TickReport;

/// State last delivered to the sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchBaseline {
    digital: DigitalSnapshot,
    last_dispatched: Vec<Option<i32>>,
}

impl DispatchBaseline {
    /// No line asserted and nothing dispatched on any channel.
    pub fn empty(channels: usize, lines: usize) -> Self {
        Self {
            digital: DigitalSnapshot::released(lines),
            last_dispatched: vec![None; channels],
        }
    }

    pub fn digital(&self) -> DigitalSnapshot {
        self.digital
    }

    pub fn last_dispatched(&self, channel: usize) -> Option<i32> {
        self.last_dispatched.get(channel).copied().flatten()
    }
}

#[derive(Debug, Clone)]
pub struct DispatchEngine {
    baseline: DispatchBaseline,
    param_ids: Vec<u8>,
    // Last observed readiness, for edge-triggered logging.
    continuous_ready: bool,
    events_connected: bool,
}

impl DispatchEngine {
    /// `param_ids[i]` is the parameter id carried by channel `i`'s events.
    pub fn new(param_ids: Vec<u8>, lines: usize) -> Self {
        Self {
            baseline: DispatchBaseline::empty(param_ids.len(), lines),
            param_ids,
            continuous_ready: true,
            events_connected: true,
        }
    }

    pub fn baseline(&self) -> &DispatchBaseline {
        &self.baseline
    }

    pub fn param_id(&self, channel: usize) -> Option<u8> {
        self.param_ids.get(channel).copied()
    }

    /// Dispatch one snapshot. Never fails; see [`TickReport`].
    pub fn dispatch<C, E>(
        &mut self,
        tick: u64,
        snapshot: &ControllerSnapshot,
        continuous: &mut C,
        events: &mut E,
    ) -> TickReport
    where
        C: ContinuousSink + ?Sized,
        E: EventSink + ?Sized,
    {
        let mut report = TickReport::new(tick);
        report.continuous = self.dispatch_continuous(tick, snapshot, continuous);
        self.dispatch_events(tick, snapshot, events, &mut report);
        report
    }

    fn dispatch_continuous<C: ContinuousSink + ?Sized>(
        &mut self,
        tick: u64,
        snapshot: &ControllerSnapshot,
        sink: &mut C,
    ) -> SendOutcome {
        let ready = sink.ready();
        self.note_continuous_ready(tick, ready);
        if !ready {
            return SendOutcome::Skipped;
        }
        let outcome = sink.send(snapshot);
        if outcome.is_accepted() {
            let digital = snapshot.digital();
            if digital != self.baseline.digital {
                debug!(tick, buttons = %digital, "digital state delivered");
            }
            self.baseline.digital = digital;
        }
        outcome
    }

    fn dispatch_events<E: EventSink + ?Sized>(
        &mut self,
        tick: u64,
        snapshot: &ControllerSnapshot,
        sink: &mut E,
        report: &mut TickReport,
    ) {
        let n = self.param_ids.len().min(snapshot.analog().len());
        for channel in 0..n {
            // Unseeded channels have no reading to report yet.
            if !snapshot.is_seeded(channel) {
                continue;
            }
            let value = snapshot.analog()[channel];
            if self.baseline.last_dispatched[channel] == Some(value) {
                continue;
            }
            let connected = sink.connected();
            self.note_events_connected(tick, connected);
            let param_id = self.param_ids[channel];
            if !connected {
                report.deferred += 1;
                debug!(tick, channel, param_id, value, "event deferred: sink not connected");
                continue;
            }
            let event = DiscreteEvent {
                channel,
                param_id,
                value,
            };
            match sink.send_event(event) {
                SendOutcome::Accepted => {
                    self.baseline.last_dispatched[channel] = Some(value);
                    debug!(tick, channel, param_id, value, "event emitted");
                    report.emitted.push(event);
                }
                SendOutcome::Skipped => {
                    report.deferred += 1;
                    debug!(tick, channel, param_id, value, "event deferred: send skipped");
                }
            }
        }
    }

    fn note_continuous_ready(&mut self, tick: u64, ready: bool) {
        if ready == self.continuous_ready {
            return;
        }
        self.continuous_ready = ready;
        if ready {
            info!(tick, "continuous sink ready again");
        } else {
            warn!(tick, "continuous sink not ready; snapshots skipped");
        }
    }

    fn note_events_connected(&mut self, tick: u64, connected: bool) {
        if connected == self.events_connected {
            return;
        }
        self.events_connected = connected;
        if connected {
            info!(tick, "event sink connected again");
        } else {
            warn!(tick, "event sink not connected; changes held for retry");
        }
    }
}
