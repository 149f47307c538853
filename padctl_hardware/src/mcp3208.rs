//! MCP3208 8-channel 12-bit SPI ADC.

use std::time::Duration;

use padctl_traits::AnalogScan;
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use tracing::trace;

use crate::error::{HwError, Result};

pub const CHANNELS: usize = 8;
pub const RAW_MAX: u16 = 4095;

pub struct Mcp3208 {
    spi: Spi,
    settle: Duration,
    selected: Option<usize>,
}

impl Mcp3208 {
    pub fn new(bus: u8, chip_select: u8, clock_hz: u32, settle: Duration) -> Result<Self> {
        let bus = match bus {
            0 => Bus::Spi0,
            1 => Bus::Spi1,
            2 => Bus::Spi2,
            other => return Err(HwError::Spi(format!("unsupported spi bus {other}"))),
        };
        let ss = match chip_select {
            0 => SlaveSelect::Ss0,
            1 => SlaveSelect::Ss1,
            2 => SlaveSelect::Ss2,
            other => return Err(HwError::Spi(format!("unsupported chip select {other}"))),
        };
        let spi = Spi::new(bus, ss, clock_hz, Mode::Mode0).map_err(|e| HwError::Spi(e.to_string()))?;
        Ok(Self {
            spi,
            settle,
            selected: None,
        })
    }

    fn convert(&mut self, channel: usize) -> Result<u16> {
        // Start bit, single-ended, channel D2..D0 spread over the first two bytes.
        let ch = channel as u8;
        let tx = [0x06 | (ch >> 2), (ch & 0x03) << 6, 0x00];
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        Ok((u16::from(rx[1] & 0x0F) << 8) | u16::from(rx[2]))
    }
}

impl AnalogScan for Mcp3208 {
    fn scan_analog(
        &mut self,
        channel: usize,
    ) -> std::result::Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        if channel >= CHANNELS {
            return Err(Box::new(HwError::ChannelOutOfRange(channel)));
        }
        if self.selected != Some(channel) {
            // The sample-and-hold needs one throwaway conversion after switching inputs.
            let _ = self.convert(channel)?;
            if !self.settle.is_zero() {
                std::thread::sleep(self.settle);
            }
            self.selected = Some(channel);
        }
        let raw = self.convert(channel)?;
        trace!(channel, raw, "mcp3208 sample");
        Ok(raw)
    }
}
