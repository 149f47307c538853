//! Sink that reports through `tracing` instead of a transport (dry runs).

use padctl_traits::{ContinuousSink, ControllerSnapshot, DiscreteEvent, EventSink, SendOutcome};

/// Always-ready sink implementing both sink roles.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ContinuousSink for LogSink {
    fn ready(&self) -> bool {
        true
    }

    fn send(&mut self, snapshot: &ControllerSnapshot) -> SendOutcome {
        tracing::trace!(
            buttons = %snapshot.digital(),
            analog = ?snapshot.analog(),
            "snapshot"
        );
        SendOutcome::Accepted
    }
}

impl EventSink for LogSink {
    fn connected(&self) -> bool {
        true
    }

    fn send_event(&mut self, event: DiscreteEvent) -> SendOutcome {
        tracing::info!(
            channel = event.channel,
            param_id = event.param_id,
            value = event.value,
            "event"
        );
        SendOutcome::Accepted
    }
}
