//! Write-side link state shared by the device-backed sinks.
//!
//! A transient write error (`WouldBlock`, `Interrupted`, `TimedOut`) only skips
//! the current send. A hard error takes the link down until `retry_after` has
//! passed, after which the next send probes the device again.

use std::io;
use std::time::{Duration, Instant};

/// Default hold-off after a hard write error.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFault {
    Transient,
    Hard,
}

pub fn classify(e: &io::Error) -> WriteFault {
    match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut => {
            WriteFault::Transient
        }
        _ => WriteFault::Hard,
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Link {
    enabled: bool,
    down_until: Option<Instant>,
    retry_after: Duration,
}

impl Link {
    pub(crate) fn new() -> Self {
        Self {
            enabled: true,
            down_until: None,
            retry_after: DEFAULT_RETRY_AFTER,
        }
    }

    pub(crate) fn set_retry_after(&mut self, retry_after: Duration) {
        self.retry_after = retry_after;
    }

    /// Manual override; also clears any pending hold-off.
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.down_until = None;
    }

    pub(crate) fn is_up(&self) -> bool {
        self.enabled && self.down_until.is_none_or(|t| Instant::now() >= t)
    }

    /// Record a failed write. Returns the fault class.
    pub(crate) fn fail(&mut self, e: &io::Error) -> WriteFault {
        let fault = classify(e);
        if fault == WriteFault::Hard {
            self.down_until = Some(Instant::now() + self.retry_after);
        }
        fault
    }

    pub(crate) fn ok(&mut self) {
        self.down_until = None;
    }
}
