//! Common numeric and period helpers for padctl_core.

use std::time::Duration;

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Tick period for a millisecond setting, clamped to 1..=1000 ms.
#[inline]
pub fn period_from_ms(ms: u64) -> Duration {
    Duration::from_millis(ms.clamp(1, MILLIS_PER_SEC))
}

/// Round to nearest, ties toward +inf (`2.5 -> 3`, `-2.5 -> -2`).
#[inline]
pub fn round_half_up(x: f32) -> i32 {
    let f = x.floor();
    if x - f >= 0.5 { f as i32 + 1 } else { f as i32 }
}

/// Integer mean rounded to nearest with ties up. `None` for an empty slice.
#[inline]
pub fn mean_round_u16(samples: &[u16]) -> Option<u16> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len() as u64;
    let sum: u64 = samples.iter().map(|&s| u64::from(s)).sum();
    // Mean of u16 values always fits in u16.
    Some(((sum + n / 2) / n) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_round_up() {
        assert_eq!(round_half_up(63.5), 64);
        assert_eq!(round_half_up(63.49), 63);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(126.5), 127);
    }

    #[test]
    fn just_below_half_rounds_down() {
        assert_eq!(round_half_up(0.499_999_97), 0);
        assert_eq!(round_half_up(63.499_996), 63);
        assert_eq!(round_half_up(-0.499_999_97), 0);
        assert_eq!(round_half_up(-1.5), -1);
    }

    #[test]
    fn mean_rounds_half_up() {
        assert_eq!(mean_round_u16(&[]), None);
        assert_eq!(mean_round_u16(&[1, 2]), Some(2));
        assert_eq!(mean_round_u16(&[1, 1, 2]), Some(1));
        assert_eq!(mean_round_u16(&[u16::MAX, u16::MAX]), Some(u16::MAX));
    }

    #[test]
    fn period_is_clamped() {
        assert_eq!(period_from_ms(0), Duration::from_millis(1));
        assert_eq!(period_from_ms(5), Duration::from_millis(5));
        assert_eq!(period_from_ms(9_999), Duration::from_secs(1));
    }
}
