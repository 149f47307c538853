pub mod clock;
pub mod snapshot;

pub use clock::{Clock, MonotonicClock};
pub use snapshot::{
    ButtonRole, ControllerSnapshot, DigitalSnapshot, DiscreteEvent, MAX_LINES, SendOutcome,
};

/// Raw analog sampling primitive: one unsigned sample per call.
pub trait AnalogScan {
    fn scan_analog(
        &mut self,
        channel: usize,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>>;
}

/// Raw digital line primitive: electrical level, `true` = high.
pub trait DigitalScan {
    fn scan_digital(
        &mut self,
        line: usize,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// Downstream consumer that wants the full state every tick.
pub trait ContinuousSink {
    fn ready(&self) -> bool;
    fn send(&mut self, snapshot: &ControllerSnapshot) -> SendOutcome;
}

/// Downstream consumer that wants only per-parameter changes.
pub trait EventSink {
    fn connected(&self) -> bool;
    fn send_event(&mut self, event: DiscreteEvent) -> SendOutcome;
}

impl<T: AnalogScan + ?Sized> AnalogScan for Box<T> {
    fn scan_analog(
        &mut self,
        channel: usize,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        (**self).scan_analog(channel)
    }
}

impl<T: DigitalScan + ?Sized> DigitalScan for Box<T> {
    fn scan_digital(
        &mut self,
        line: usize,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        (**self).scan_digital(line)
    }
}

impl<T: ContinuousSink + ?Sized> ContinuousSink for Box<T> {
    fn ready(&self) -> bool {
        (**self).ready()
    }
    fn send(&mut self, snapshot: &ControllerSnapshot) -> SendOutcome {
        (**self).send(snapshot)
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn connected(&self) -> bool {
        (**self).connected()
    }
    fn send_event(&mut self, event: DiscreteEvent) -> SendOutcome {
        (**self).send_event(event)
    }
}
