//! Configuration types for the controller core.
//!
//! These are the runtime configuration structs used by `Controller`.
//! They are separate from the TOML-deserialized config in `padctl_config`.

use std::time::Duration;

use padctl_traits::ButtonRole;

/// Per-channel conditioning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionerCfg {
    /// Full-scale raw reading.
    pub raw_max: u16,
    pub out_min: i32,
    pub out_max: i32,
    /// Extended-range margin in output units. Reaching a rail needs
    /// `margin` units of extra travel past it.
    pub margin: f32,
    /// Raw samples averaged per tick.
    pub oversample: usize,
    /// EMA coefficient in (0.0, 1.0].
    pub alpha: f32,
    /// Minimum |filtered - stable| that commits a new stable value.
    pub threshold: f32,
}

impl Default for ConditionerCfg {
    fn default() -> Self {
        Self {
            raw_max: 4095,
            out_min: 0,
            out_max: 127,
            margin: 16.0,
            oversample: 32,
            alpha: 0.10,
            threshold: 1.0,
        }
    }
}

impl ConditionerCfg {
    /// Check ranges; returns the first violated constraint.
    pub fn check(&self) -> Result<(), &'static str> {
        if self.raw_max == 0 {
            return Err("raw_max must be >= 1");
        }
        if self.out_min >= self.out_max {
            return Err("out_min must be < out_max");
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err("margin must be finite and >= 0");
        }
        if self.oversample == 0 {
            return Err("oversample must be >= 1");
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err("alpha must be in (0.0, 1.0]");
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err("threshold must be finite and >= 0");
        }
        Ok(())
    }
}

/// One analog channel: where it is sampled, how it is conditioned,
/// and which external parameter its events carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelCfg {
    pub input: usize,
    pub param_id: u8,
    pub conditioner: ConditionerCfg,
}

impl ChannelCfg {
    pub fn new(input: usize, param_id: u8) -> Self {
        Self {
            input,
            param_id,
            conditioner: ConditionerCfg::default(),
        }
    }

    #[must_use]
    pub fn with_conditioner(mut self, conditioner: ConditionerCfg) -> Self {
        self.conditioner = conditioner;
        self
    }
}

/// One digital line in bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCfg {
    /// Index passed to `DigitalScan::scan_digital`.
    pub pin: usize,
    /// Low level means engaged.
    pub active_low: bool,
    pub role: Option<ButtonRole>,
}

impl LineCfg {
    pub fn new(pin: usize, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            role: None,
        }
    }
}

/// Event-protocol dispatch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchCfg {
    /// 1-based protocol channel.
    pub midi_channel: u8,
}

impl Default for DispatchCfg {
    fn default() -> Self {
        Self { midi_channel: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCfg {
    pub period: Duration,
}

impl Default for TickCfg {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(5),
        }
    }
}

/// The four pots of the reference panel on CC 20..=23.
pub fn default_channels() -> Vec<ChannelCfg> {
    (0..4u8)
        .map(|i| ChannelCfg::new(usize::from(i), 20 + i))
        .collect()
}
