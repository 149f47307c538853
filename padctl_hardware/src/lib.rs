pub mod error;
pub mod gamepad;
pub mod link;
pub mod log_sink;
pub mod midi;

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod gpio;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod mcp3208;

pub use gamepad::{GamepadReport, GamepadSink};
pub use log_sink::LogSink;
pub use midi::MidiCcSink;

use padctl_traits::{AnalogScan, DigitalScan};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::error::HwError;

#[derive(Debug)]
struct PanelState {
    analog: BTreeMap<usize, u16>,
    lines: BTreeMap<usize, bool>,
    noise: u16,
    rng: u32,
    faulty_inputs: BTreeSet<usize>,
    analog_reads: u64,
}

/// Simulated control panel: programmable analog levels and line levels.
///
/// Clones share the same state, so a test or the CLI can keep a handle while
/// the controller owns another one as its scan source.
#[derive(Debug, Clone)]
pub struct SimulatedPanel {
    state: Rc<RefCell<PanelState>>,
}

impl Default for SimulatedPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPanel {
    pub fn new() -> Self {
        SimulatedPanel {
            state: Rc::new(RefCell::new(PanelState {
                analog: BTreeMap::new(),
                lines: BTreeMap::new(),
                noise: 0,
                rng: 0x9E37_79B9,
                faulty_inputs: BTreeSet::new(),
                analog_reads: 0,
            })),
        }
    }

    /// Set the raw level an analog input reports.
    pub fn set_analog(&self, input: usize, raw: u16) {
        self.state.borrow_mut().analog.insert(input, raw);
    }

    /// Set the electrical level of a digital line (`true` = high).
    pub fn set_line(&self, pin: usize, high: bool) {
        self.state.borrow_mut().lines.insert(pin, high);
    }

    /// Add uniform pseudo-random noise of +/- `amplitude` counts to every analog read.
    /// The sequence is deterministic for a given `seed`.
    pub fn set_noise(&self, amplitude: u16, seed: u32) {
        let mut st = self.state.borrow_mut();
        st.noise = amplitude;
        st.rng = seed.max(1);
    }

    /// Make every read of `input` fail until cleared.
    pub fn set_analog_fault(&self, input: usize, faulty: bool) {
        let mut st = self.state.borrow_mut();
        if faulty {
            st.faulty_inputs.insert(input);
        } else {
            st.faulty_inputs.remove(&input);
        }
    }

    /// Number of analog conversions served so far (including failed ones).
    pub fn analog_reads(&self) -> u64 {
        self.state.borrow().analog_reads
    }
}

impl PanelState {
    fn next_noise(&mut self) -> i32 {
        if self.noise == 0 {
            return 0;
        }
        // xorshift32
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        let span = 2 * i64::from(self.noise) + 1;
        (i64::from(x) % span - i64::from(self.noise)) as i32
    }
}

impl AnalogScan for SimulatedPanel {
    fn scan_analog(
        &mut self,
        channel: usize,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let mut st = self.state.borrow_mut();
        st.analog_reads = st.analog_reads.saturating_add(1);
        if st.faulty_inputs.contains(&channel) {
            return Err(Box::new(HwError::Injected("analog input")));
        }
        let Some(level) = st.analog.get(&channel).copied() else {
            return Err(Box::new(HwError::ChannelOutOfRange(channel)));
        };
        let noisy = i32::from(level) + st.next_noise();
        Ok(noisy.clamp(0, i32::from(u16::MAX)) as u16)
    }
}

impl DigitalScan for SimulatedPanel {
    fn scan_digital(
        &mut self,
        line: usize,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.state
            .borrow()
            .lines
            .get(&line)
            .copied()
            .ok_or_else(|| HwError::LineOutOfRange(line).into())
    }
}
