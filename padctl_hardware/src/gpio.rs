//! Digital lines on Raspberry Pi GPIO.

use std::collections::BTreeMap;

use padctl_traits::DigitalScan;
use rppal::gpio::{Gpio, InputPin};
use tracing::debug;

use crate::error::{HwError, Result};

/// Input pins keyed by BCM pin number. Active-low lines get a pull-up,
/// active-high lines a pull-down, so an open switch reads as released.
pub struct GpioLines {
    pins: BTreeMap<usize, InputPin>,
}

impl GpioLines {
    /// `lines` is a list of `(bcm_pin, active_low)`.
    pub fn new(lines: &[(u8, bool)]) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let mut pins = BTreeMap::new();
        for &(pin, active_low) in lines {
            let p = gpio
                .get(pin)
                .map_err(|e| HwError::Gpio(format!("pin {pin}: {e}")))?;
            let input = if active_low {
                p.into_input_pullup()
            } else {
                p.into_input_pulldown()
            };
            debug!(pin, active_low, "gpio line configured");
            pins.insert(usize::from(pin), input);
        }
        Ok(Self { pins })
    }
}

impl DigitalScan for GpioLines {
    fn scan_digital(
        &mut self,
        line: usize,
    ) -> std::result::Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let pin = self
            .pins
            .get(&line)
            .ok_or(HwError::LineOutOfRange(line))?;
        Ok(pin.is_high())
    }
}
