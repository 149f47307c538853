#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and trace parsing for the controller.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The trace CSV loader enforces headers and groups raw samples into
//!   per-tick oversampling bursts for offline replay.
use std::collections::BTreeSet;

use serde::Deserialize;

mod trace;

pub use trace::{Trace, TraceRow, TraceTick, load_trace_csv, load_trace_reader};

/// Upper bound on analog channels and digital lines.
pub const MAX_CHANNELS: usize = 32;
/// Largest accepted oversampling burst.
pub const MAX_OVERSAMPLE: u32 = 4096;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TickCfg {
    /// Tick period in milliseconds.
    pub period_ms: u64,
}

impl Default for TickCfg {
    fn default() -> Self {
        Self { period_ms: 5 }
    }
}

/// Conditioning defaults shared by every channel, plus the channel list.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnalogCfg {
    pub raw_max: u16,
    pub out_min: i32,
    pub out_max: i32,
    /// Extended-range margin in output units on each side of the bounds.
    pub margin: f32,
    pub oversample: u32,
    pub alpha: f32,
    pub threshold: f32,
    pub channels: Vec<ChannelCfg>,
}

impl Default for AnalogCfg {
    fn default() -> Self {
        Self {
            raw_max: 4095,
            out_min: 0,
            out_max: 127,
            margin: 16.0,
            oversample: 32,
            alpha: 0.10,
            threshold: 1.0,
            channels: Vec::new(),
        }
    }
}

/// One analog channel. Unset overrides inherit from `[analog]`.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelCfg {
    /// ADC input index the channel is sampled from.
    pub input: usize,
    /// External parameter id (MIDI CC number).
    pub param_id: u8,
    pub oversample: Option<u32>,
    pub alpha: Option<f32>,
    pub threshold: Option<f32>,
    pub margin: Option<f32>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineRole {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    Start,
    Select,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LineCfg {
    /// BCM GPIO pin (or simulated line index).
    pub pin: u8,
    /// Buttons wired to ground with a pull-up read low when pressed.
    #[serde(default = "default_active_low")]
    pub active_low: bool,
    #[serde(default)]
    pub role: Option<LineRole>,
}

fn default_active_low() -> bool {
    true
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct DigitalCfg {
    pub lines: Vec<LineCfg>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContinuousKind {
    Gamepad,
    #[default]
    Log,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Midi,
    #[default]
    Log,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DispatchCfg {
    /// Event-protocol channel, 1-based.
    pub midi_channel: u8,
    pub continuous: ContinuousKind,
    pub events: EventKind,
    /// HID gadget endpoint, e.g. `/dev/hidg0`. Required for `continuous = "gamepad"`.
    pub gamepad_device: Option<String>,
    /// Raw MIDI device, e.g. `/dev/snd/midiC1D0`. Required for `events = "midi"`.
    pub midi_device: Option<String>,
}

impl Default for DispatchCfg {
    fn default() -> Self {
        Self {
            midi_channel: 1,
            continuous: ContinuousKind::default(),
            events: EventKind::default(),
            gamepad_device: None,
            midi_device: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Simulated,
    Rpi,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Hardware {
    pub backend: Backend,
    pub spi_bus: u8,
    pub adc_chip_select: u8,
    pub spi_clock_hz: u32,
    /// Settle delay after the ADC switches input, microseconds.
    pub settle_us: u64,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            backend: Backend::Simulated,
            spi_bus: 0,
            adc_chip_select: 0,
            spi_clock_hz: 1_000_000,
            settle_us: 5,
        }
    }
}

/// Levels used by the simulated backend.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationCfg {
    /// Raw level every analog input reports.
    pub level: u16,
    /// Uniform noise amplitude in raw counts.
    pub noise: u16,
    pub seed: u32,
}

impl Default for SimulationCfg {
    fn default() -> Self {
        Self {
            level: 2048,
            noise: 0,
            seed: 1,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tick: TickCfg,
    #[serde(default)]
    pub analog: AnalogCfg,
    #[serde(default)]
    pub digital: DigitalCfg,
    #[serde(default)]
    pub dispatch: DispatchCfg,
    #[serde(default)]
    pub hardware: Hardware,
    #[serde(default)]
    pub simulation: SimulationCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

fn check_oversample(what: &str, n: u32) -> eyre::Result<()> {
    if n == 0 || n > MAX_OVERSAMPLE {
        eyre::bail!("{what} must be in 1..={MAX_OVERSAMPLE}");
    }
    Ok(())
}

fn check_alpha(what: &str, alpha: f32) -> eyre::Result<()> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        eyre::bail!("{what} must be in (0.0, 1.0]");
    }
    Ok(())
}

fn check_non_negative(what: &str, x: f32) -> eyre::Result<()> {
    if !x.is_finite() || x < 0.0 {
        eyre::bail!("{what} must be finite and >= 0");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Tick
        if self.tick.period_ms == 0 || self.tick.period_ms > 1000 {
            eyre::bail!("tick.period_ms must be in 1..=1000");
        }

        // Analog defaults
        let a = &self.analog;
        if a.raw_max == 0 {
            eyre::bail!("analog.raw_max must be >= 1");
        }
        if a.out_min >= a.out_max {
            eyre::bail!("analog.out_min must be < analog.out_max");
        }
        check_non_negative("analog.margin", a.margin)?;
        check_oversample("analog.oversample", a.oversample)?;
        check_alpha("analog.alpha", a.alpha)?;
        check_non_negative("analog.threshold", a.threshold)?;

        // Channels
        if a.channels.is_empty() {
            eyre::bail!("analog.channels must list at least one channel");
        }
        if a.channels.len() > MAX_CHANNELS {
            eyre::bail!("analog.channels supports at most {MAX_CHANNELS} channels");
        }
        let mut inputs = BTreeSet::new();
        for (i, ch) in a.channels.iter().enumerate() {
            if !inputs.insert(ch.input) {
                eyre::bail!("analog.channels[{i}]: duplicate input {}", ch.input);
            }
            if ch.param_id > 127 {
                eyre::bail!("analog.channels[{i}].param_id must be <= 127");
            }
            if let Some(n) = ch.oversample {
                check_oversample(&format!("analog.channels[{i}].oversample"), n)?;
            }
            if let Some(alpha) = ch.alpha {
                check_alpha(&format!("analog.channels[{i}].alpha"), alpha)?;
            }
            if let Some(t) = ch.threshold {
                check_non_negative(&format!("analog.channels[{i}].threshold"), t)?;
            }
            if let Some(m) = ch.margin {
                check_non_negative(&format!("analog.channels[{i}].margin"), m)?;
            }
        }

        // Digital
        if self.digital.lines.len() > MAX_CHANNELS {
            eyre::bail!("digital.lines supports at most {MAX_CHANNELS} lines");
        }
        let mut pins = BTreeSet::new();
        for (i, line) in self.digital.lines.iter().enumerate() {
            if !pins.insert(line.pin) {
                eyre::bail!("digital.lines[{i}]: duplicate pin {}", line.pin);
            }
        }

        // Dispatch
        if !(1..=16).contains(&self.dispatch.midi_channel) {
            eyre::bail!("dispatch.midi_channel must be in 1..=16");
        }
        if self.dispatch.continuous == ContinuousKind::Gamepad
            && self.dispatch.gamepad_device.is_none()
        {
            eyre::bail!("dispatch.gamepad_device is required when continuous = \"gamepad\"");
        }
        if self.dispatch.events == EventKind::Midi && self.dispatch.midi_device.is_none() {
            eyre::bail!("dispatch.midi_device is required when events = \"midi\"");
        }

        // Hardware
        if self.hardware.spi_clock_hz == 0 {
            eyre::bail!("hardware.spi_clock_hz must be > 0");
        }
        if self.hardware.settle_us > 10_000 {
            eyre::bail!("hardware.settle_us is unreasonably large (>10ms)");
        }

        // Simulation
        if self.simulation.level > a.raw_max {
            eyre::bail!("simulation.level must be <= analog.raw_max");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never, daily, hourly");
        }

        Ok(())
    }
}
