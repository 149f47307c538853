//! MIDI Control Change encoding for the event sink.

use std::io::Write;
use std::time::Duration;

use padctl_traits::{DiscreteEvent, EventSink, SendOutcome};
use tracing::{debug, warn};

use crate::link::{Link, WriteFault};

pub const STATUS_CC: u8 = 0xB0;

/// Encode a Control Change message. `channel` is 1-based and clamped to 1..=16,
/// `cc` is masked to 7 bits and `value` clamped to 0..=127.
pub fn encode_cc(channel: u8, cc: u8, value: i32) -> [u8; 3] {
    let channel = channel.clamp(1, 16);
    let status = STATUS_CC | ((channel - 1) & 0x0F);
    [status, cc & 0x7F, value.clamp(0, 127) as u8]
}

/// Event sink emitting one CC message per discrete event on a raw MIDI stream.
pub struct MidiCcSink<W: Write> {
    writer: W,
    channel: u8,
    link: Link,
    sent: u64,
}

impl<W: Write> MidiCcSink<W> {
    pub fn new(writer: W, channel: u8) -> Self {
        Self {
            writer,
            channel: channel.clamp(1, 16),
            link: Link::new(),
            sent: 0,
        }
    }

    /// Force the stream up or down. Clears any hold-off after a write error.
    pub fn set_connected(&mut self, connected: bool) {
        self.link.set_enabled(connected);
    }

    /// How long the stream stays down after a hard write error.
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.link.set_retry_after(retry_after);
        self
    }

    /// Number of messages written so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> EventSink for MidiCcSink<W> {
    fn connected(&self) -> bool {
        self.link.is_up()
    }

    fn send_event(&mut self, event: DiscreteEvent) -> SendOutcome {
        if !self.link.is_up() {
            return SendOutcome::Skipped;
        }
        let msg = encode_cc(self.channel, event.param_id, event.value);
        if let Err(e) = self.writer.write_all(&msg).and_then(|()| self.writer.flush()) {
            match self.link.fail(&e) {
                WriteFault::Transient => debug!(error = %e, "midi write would block; retrying"),
                WriteFault::Hard => warn!(error = %e, "midi write failed; stream held down"),
            }
            return SendOutcome::Skipped;
        }
        self.link.ok();
        self.sent = self.sent.saturating_add(1);
        debug!(
            channel = self.channel,
            cc = event.param_id,
            value = event.value,
            "midi cc"
        );
        SendOutcome::Accepted
    }
}
