//! Type-state builder for `PadController` and generic `build_controller` constructor.
//!
//! The builder enforces at compile time that both scan sources and both sinks
//! are provided before `build()` is available. `try_build()` is always
//! available for dynamic checks.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use padctl_traits::{AnalogScan, ContinuousSink, DigitalScan, EventSink, MAX_LINES};

use crate::config::{ChannelCfg, LineCfg, default_channels};
use crate::controller::Controller;
use crate::error::{BuildError, Result};

/// Public dynamic (boxed) controller.
pub type PadController = Controller<
    Box<dyn AnalogScan>,
    Box<dyn DigitalScan>,
    Box<dyn ContinuousSink>,
    Box<dyn EventSink>,
>;

impl PadController {
    /// Start building a controller.
    pub fn builder() -> ControllerBuilder<Missing, Missing, Missing> {
        ControllerBuilder::default()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `PadController`. All fields are validated on `build()`.
pub struct ControllerBuilder<A, D, K> {
    analog: Option<Box<dyn AnalogScan>>,
    digital: Option<Box<dyn DigitalScan>>,
    continuous: Option<Box<dyn ContinuousSink>>,
    events: Option<Box<dyn EventSink>>,
    channels: Option<Vec<ChannelCfg>>,
    lines: Vec<LineCfg>,
    _a: PhantomData<A>,
    _d: PhantomData<D>,
    _k: PhantomData<K>,
}

impl Default for ControllerBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            analog: None,
            digital: None,
            continuous: None,
            events: None,
            channels: None,
            lines: Vec::new(),
            _a: PhantomData,
            _d: PhantomData,
            _k: PhantomData,
        }
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

/// Validate the channel and line tables.
///
/// This is the single source of truth for validation, used by both
/// `ControllerBuilder::try_build()` and `build_controller()`.
fn validate(channels: &[ChannelCfg], lines: &[LineCfg]) -> Result<()> {
    if channels.is_empty() {
        return Err(invalid("at least one analog channel is required"));
    }
    if channels.len() > MAX_LINES {
        return Err(invalid("too many analog channels (max 32)"));
    }
    let mut inputs = BTreeSet::new();
    for ch in channels {
        ch.conditioner.check().map_err(invalid)?;
        if ch.param_id > 127 {
            return Err(invalid("param_id must be <= 127"));
        }
        if !inputs.insert(ch.input) {
            return Err(invalid("duplicate analog input"));
        }
    }
    if lines.len() > MAX_LINES {
        return Err(invalid("too many digital lines (max 32)"));
    }
    let mut pins = BTreeSet::new();
    for line in lines {
        if !pins.insert(line.pin) {
            return Err(invalid("duplicate digital pin"));
        }
    }
    Ok(())
}

impl<A, D, K> ControllerBuilder<A, D, K> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<PadController> {
        let analog = self
            .analog
            .ok_or_else(|| eyre::Report::new(BuildError::MissingScan))?;
        let digital = self
            .digital
            .ok_or_else(|| eyre::Report::new(BuildError::MissingScan))?;
        let continuous = self
            .continuous
            .ok_or_else(|| eyre::Report::new(BuildError::MissingContinuousSink))?;
        let events = self
            .events
            .ok_or_else(|| eyre::Report::new(BuildError::MissingEventSink))?;
        let channels = self.channels.unwrap_or_else(default_channels);

        build_controller(analog, digital, continuous, events, &channels, self.lines)
    }

    /// Analog channels in index order. Defaults to the four-pot layout.
    pub fn with_channels(mut self, channels: Vec<ChannelCfg>) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Digital lines in bit order.
    pub fn with_lines(mut self, lines: Vec<LineCfg>) -> Self {
        self.lines = lines;
        self
    }
}

// Setters that advance type-state
impl<D, K> ControllerBuilder<Missing, D, K> {
    pub fn with_analog_scan(
        self,
        scan: impl AnalogScan + 'static,
    ) -> ControllerBuilder<Set, D, K> {
        ControllerBuilder {
            analog: Some(Box::new(scan)),
            digital: self.digital,
            continuous: self.continuous,
            events: self.events,
            channels: self.channels,
            lines: self.lines,
            _a: PhantomData,
            _d: PhantomData,
            _k: PhantomData,
        }
    }
}

impl<A, K> ControllerBuilder<A, Missing, K> {
    pub fn with_digital_scan(
        self,
        scan: impl DigitalScan + 'static,
    ) -> ControllerBuilder<A, Set, K> {
        ControllerBuilder {
            analog: self.analog,
            digital: Some(Box::new(scan)),
            continuous: self.continuous,
            events: self.events,
            channels: self.channels,
            lines: self.lines,
            _a: PhantomData,
            _d: PhantomData,
            _k: PhantomData,
        }
    }
}

impl<A, D> ControllerBuilder<A, D, Missing> {
    pub fn with_sinks(
        self,
        continuous: impl ContinuousSink + 'static,
        events: impl EventSink + 'static,
    ) -> ControllerBuilder<A, D, Set> {
        ControllerBuilder {
            analog: self.analog,
            digital: self.digital,
            continuous: Some(Box::new(continuous)),
            events: Some(Box::new(events)),
            channels: self.channels,
            lines: self.lines,
            _a: PhantomData,
            _d: PhantomData,
            _k: PhantomData,
        }
    }
}

impl ControllerBuilder<Set, Set, Set> {
    /// Validate and build. Only available when scans and sinks are set.
    pub fn build(self) -> Result<PadController> {
        self.try_build()
    }
}

/// Build a generic, statically-dispatched `Controller` from concrete parts.
pub fn build_controller<A, D, C, E>(
    analog: A,
    digital: D,
    continuous: C,
    events: E,
    channels: &[ChannelCfg],
    lines: Vec<LineCfg>,
) -> Result<Controller<A, D, C, E>>
where
    A: AnalogScan,
    D: DigitalScan,
    C: ContinuousSink,
    E: EventSink,
{
    validate(channels, &lines)?;
    Ok(Controller::from_parts(
        analog, digital, continuous, events, channels, lines,
    ))
}
