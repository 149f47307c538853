//! Offline replay of raw-sample traces through the conditioner and the
//! dispatch engine, with sinks that are always available.
//!
//! Each trace tick feeds every configured channel its burst (possibly empty),
//! so the emitted sequence is exactly what a live controller would produce
//! for the same samples.

use padctl_config::Trace;
use padctl_traits::{
    ContinuousSink, ControllerSnapshot, DigitalSnapshot, DiscreteEvent, EventSink, SendOutcome,
};

use crate::aggregate::aggregate;
use crate::conditioner::Conditioner;
use crate::config::ChannelCfg;
use crate::dispatch::DispatchEngine;
use crate::error::{PadError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayEvent {
    /// Tick number from the trace.
    pub tick: u64,
    pub event: DiscreteEvent,
}

struct Offline;

impl ContinuousSink for Offline {
    fn ready(&self) -> bool {
        true
    }
    fn send(&mut self, _snapshot: &ControllerSnapshot) -> SendOutcome {
        SendOutcome::Accepted
    }
}

impl EventSink for Offline {
    fn connected(&self) -> bool {
        true
    }
    fn send_event(&mut self, _event: DiscreteEvent) -> SendOutcome {
        SendOutcome::Accepted
    }
}

/// Replay `trace` and return every emitted event in order.
///
/// Trace channels index into `channels`; a trace referencing a channel that
/// is not configured is rejected.
pub fn replay(trace: &Trace, channels: &[ChannelCfg]) -> Result<Vec<ReplayEvent>> {
    if let Some(max) = trace.max_channel()
        && max >= channels.len()
    {
        return Err(eyre::Report::new(PadError::Config(format!(
            "trace references channel {max} but only {} channel(s) are configured",
            channels.len()
        ))));
    }

    let mut conditioner = Conditioner::new(channels.iter().map(|c| c.conditioner));
    let mut engine = DispatchEngine::new(channels.iter().map(|c| c.param_id).collect(), 0);
    let (mut continuous, mut events) = (Offline, Offline);
    let mut out = Vec::new();

    for t in &trace.ticks {
        for i in 0..channels.len() {
            conditioner.process(i, t.burst(i));
        }
        let snapshot = aggregate(DigitalSnapshot::released(0), &conditioner.outputs())
            .with_unseeded(conditioner.unseeded_mask());
        let report = engine.dispatch(t.tick, &snapshot, &mut continuous, &mut events);
        out.extend(report.emitted.into_iter().map(|event| ReplayEvent {
            tick: t.tick,
            event,
        }));
    }
    tracing::debug!(ticks = trace.ticks.len(), events = out.len(), "replay finished");
    Ok(out)
}
