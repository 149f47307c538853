//! HID gamepad report encoding for the continuous sink.
//!
//! Layout follows the common 11-byte gamepad report (six signed axes, hat,
//! 32-bit button field) prefixed by the report id. The d-pad is reported on
//! the X/Y axes and the hat is left centered.

use std::io::Write;
use std::time::Duration;

use padctl_traits::{ButtonRole, ContinuousSink, ControllerSnapshot, DigitalSnapshot, SendOutcome};
use tracing::{trace, warn};

use crate::link::{Link, WriteFault};

pub const REPORT_ID: u8 = 1;
pub const AXIS_MIN: i8 = -127;
pub const AXIS_MAX: i8 = 127;
/// Hat value meaning "no direction".
pub const HAT_NULL: u8 = 0x0F;
/// Encoded length including the report id.
pub const REPORT_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamepadReport {
    pub x: i8,
    pub y: i8,
    pub z: i8,
    pub rz: i8,
    pub rx: i8,
    pub ry: i8,
    pub hat: u8,
    pub buttons: u32,
}

impl Default for GamepadReport {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            rz: 0,
            rx: 0,
            ry: 0,
            hat: HAT_NULL,
            buttons: 0,
        }
    }
}

impl GamepadReport {
    /// Map engaged lines to axes and buttons using their roles.
    ///
    /// `roles[i]` is the role of bit `i`; lines without a role are ignored.
    /// When opposite directions are both engaged, right and down win.
    pub fn from_digital(digital: DigitalSnapshot, roles: &[Option<ButtonRole>]) -> Self {
        let engaged = |role: ButtonRole| {
            roles
                .iter()
                .enumerate()
                .any(|(bit, r)| *r == Some(role) && digital.is_engaged(bit))
        };

        let mut report = GamepadReport::default();
        if engaged(ButtonRole::Left) {
            report.x = AXIS_MIN;
        }
        if engaged(ButtonRole::Right) {
            report.x = AXIS_MAX;
        }
        if engaged(ButtonRole::Up) {
            report.y = AXIS_MIN;
        }
        if engaged(ButtonRole::Down) {
            report.y = AXIS_MAX;
        }

        let buttons = [
            (ButtonRole::A, 0),
            (ButtonRole::B, 1),
            (ButtonRole::Select, 2),
            (ButtonRole::Start, 3),
        ];
        for (role, bit) in buttons {
            if engaged(role) {
                report.buttons |= 1 << bit;
            }
        }
        report
    }

    pub fn to_bytes(&self) -> [u8; REPORT_LEN] {
        let b = self.buttons.to_le_bytes();
        [
            REPORT_ID,
            self.x as u8,
            self.y as u8,
            self.z as u8,
            self.rz as u8,
            self.rx as u8,
            self.ry as u8,
            self.hat,
            b[0],
            b[1],
            b[2],
            b[3],
        ]
    }
}

/// Continuous sink writing one gamepad report per accepted snapshot.
pub struct GamepadSink<W: Write> {
    writer: W,
    roles: Vec<Option<ButtonRole>>,
    link: Link,
    last_report: Option<GamepadReport>,
}

impl<W: Write> GamepadSink<W> {
    pub fn new(writer: W, roles: Vec<Option<ButtonRole>>) -> Self {
        Self {
            writer,
            roles,
            link: Link::new(),
            last_report: None,
        }
    }

    /// Mark the endpoint as (un)available, e.g. after the host re-enumerates.
    pub fn set_online(&mut self, online: bool) {
        self.link.set_enabled(online);
    }

    /// How long the endpoint stays offline after a hard write error.
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.link.set_retry_after(retry_after);
        self
    }

    pub fn last_report(&self) -> Option<GamepadReport> {
        self.last_report
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> ContinuousSink for GamepadSink<W> {
    fn ready(&self) -> bool {
        self.link.is_up()
    }

    fn send(&mut self, snapshot: &ControllerSnapshot) -> SendOutcome {
        if !self.link.is_up() {
            return SendOutcome::Skipped;
        }
        let report = GamepadReport::from_digital(snapshot.digital(), &self.roles);
        let bytes = report.to_bytes();
        if let Err(e) = self
            .writer
            .write_all(&bytes)
            .and_then(|()| self.writer.flush())
        {
            match self.link.fail(&e) {
                WriteFault::Transient => trace!(error = %e, "gamepad report would block"),
                WriteFault::Hard => {
                    warn!(error = %e, "gamepad report write failed; endpoint held offline");
                }
            }
            return SendOutcome::Skipped;
        }
        self.link.ok();
        trace!(x = report.x, y = report.y, buttons = report.buttons, "gamepad report");
        self.last_report = Some(report);
        SendOutcome::Accepted
    }
}
