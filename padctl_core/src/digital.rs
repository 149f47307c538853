//! Digital line sampling with per-line polarity.

use padctl_traits::{DigitalScan, DigitalSnapshot, MAX_LINES};
use tracing::warn;

use crate::config::LineCfg;
use crate::hw_error::map_hw_error;

/// Electrical level to "engaged": active-low lines are inverted.
#[inline]
pub fn normalize(level_high: bool, active_low: bool) -> bool {
    level_high != active_low
}

/// Reads every configured line into a bitfield in configuration order.
/// Stateless; no debouncing.
#[derive(Debug, Clone, Default)]
pub struct DigitalSampler {
    lines: Vec<LineCfg>,
}

impl DigitalSampler {
    pub fn new(lines: Vec<LineCfg>) -> Self {
        let mut lines = lines;
        lines.truncate(MAX_LINES);
        Self { lines }
    }

    pub fn lines(&self) -> &[LineCfg] {
        &self.lines
    }

    pub fn width(&self) -> usize {
        self.lines.len()
    }

    /// Sample all lines. A failed read reports the line released.
    /// Returns the snapshot and the number of failed reads.
    pub fn sample<D: DigitalScan + ?Sized>(&self, scan: &mut D) -> (DigitalSnapshot, usize) {
        let mut snap = DigitalSnapshot::released(self.lines.len());
        let mut failures = 0;
        for (bit, line) in self.lines.iter().enumerate() {
            match scan.scan_digital(line.pin) {
                Ok(level) => {
                    snap = snap.with_line(bit, normalize(level, line.active_low));
                }
                Err(e) => {
                    failures += 1;
                    let err = map_hw_error(e.as_ref());
                    warn!(line = bit, pin = line.pin, error = %err, "digital read failed; line reported released");
                }
            }
        }
        (snap, failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Levels(Vec<Option<bool>>);

    impl DigitalScan for Levels {
        fn scan_digital(
            &mut self,
            line: usize,
        ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
            self.0
                .get(line)
                .copied()
                .flatten()
                .ok_or_else(|| std::io::Error::other("no level").into())
        }
    }

    #[test]
    fn polarity_table() {
        assert!(normalize(true, false));
        assert!(!normalize(false, false));
        assert!(normalize(false, true));
        assert!(!normalize(true, true));
    }

    #[test]
    fn packs_in_configuration_order() {
        // bit 0 reads pin 2, bit 1 reads pin 0
        let sampler = DigitalSampler::new(vec![LineCfg::new(2, true), LineCfg::new(0, false)]);
        let mut scan = Levels(vec![Some(true), None, Some(false)]);
        let (snap, failures) = sampler.sample(&mut scan);
        assert_eq!(failures, 0);
        assert_eq!(snap.bits(), 0b11);
        assert_eq!(snap.width(), 2);
    }

    #[test]
    fn failed_read_is_released() {
        let sampler = DigitalSampler::new(vec![LineCfg::new(1, true), LineCfg::new(0, true)]);
        let mut scan = Levels(vec![Some(false), None]);
        let (snap, failures) = sampler.sample(&mut scan);
        assert_eq!(failures, 1);
        assert!(!snap.is_engaged(0));
        assert!(snap.is_engaged(1));
    }
}
