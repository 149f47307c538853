//! Maps `Box<dyn Error>` from trait boundaries to typed `PadError`.
//!
//! Scan traits in `padctl_traits` use `Box<dyn Error + Send + Sync>`; this
//! module converts those to our typed error enum, with an optional
//! feature-gated path for `padctl_hardware::HwError` downcasting.

use crate::error::PadError;

/// Map a trait-boundary error to a typed `PadError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> PadError {
    #[cfg(feature = "hardware-errors")]
    {
        use padctl_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::ChannelOutOfRange(_) | HwError::LineOutOfRange(_) => {
                    PadError::Config(hw.to_string())
                }
                HwError::Io(_) => PadError::Io(hw.to_string()),
                other => PadError::HardwareFault(other.to_string()),
            };
        }
    }

    if let Some(io) = e.downcast_ref::<std::io::Error>() {
        return PadError::Io(io.to_string());
    }

    // Fallback: string-based detection
    let s = e.to_string();
    if s.to_lowercase().contains("out of range") {
        PadError::Config(s)
    } else {
        PadError::Hardware(s)
    }
}
