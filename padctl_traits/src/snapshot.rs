//! Per-tick state shared between the core and the sink adapters.

/// Maximum number of digital lines (and analog channels) a snapshot can carry.
pub const MAX_LINES: usize = 32;

/// Fixed-width bitfield of digital lines after polarity normalization.
///
/// Bit `i` set means line `i` (in configuration order) is engaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DigitalSnapshot {
    bits: u32,
    width: u8,
}

impl DigitalSnapshot {
    /// All lines released.
    pub fn released(width: usize) -> Self {
        Self {
            bits: 0,
            width: width.min(MAX_LINES) as u8,
        }
    }

    /// Build from a raw bitfield; bits beyond `width` are dropped.
    pub fn from_bits(bits: u32, width: usize) -> Self {
        let width = width.min(MAX_LINES);
        let mask = if width == MAX_LINES {
            u32::MAX
        } else {
            (1u32 << width) - 1
        };
        Self {
            bits: bits & mask,
            width: width as u8,
        }
    }

    /// Return a copy with line `line` set to `engaged`. Out-of-range lines are ignored.
    #[must_use]
    pub fn with_line(self, line: usize, engaged: bool) -> Self {
        if line >= self.width() {
            return self;
        }
        let bit = 1u32 << line;
        let bits = if engaged {
            self.bits | bit
        } else {
            self.bits & !bit
        };
        Self { bits, ..self }
    }

    pub fn is_engaged(&self, line: usize) -> bool {
        line < self.width() && self.bits & (1u32 << line) != 0
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// Iterate line states in bit order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.width()).map(|i| self.is_engaged(i))
    }
}

impl std::fmt::Display for DigitalSnapshot {
    /// Renders bit 0 first, e.g. `10000000` for line 0 engaged out of eight.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for engaged in self.iter() {
            f.write_str(if engaged { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// One tick's combined digital + analog state. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSnapshot {
    digital: DigitalSnapshot,
    analog: Box<[i32]>,
    // Channels that have not produced a reading yet; their value is the output floor.
    unseeded: u32,
}

impl ControllerSnapshot {
    pub fn new(digital: DigitalSnapshot, analog: impl Into<Box<[i32]>>) -> Self {
        Self {
            digital,
            analog: analog.into(),
            unseeded: 0,
        }
    }

    /// Flag channels (bit per channel index) that have never been seeded.
    #[must_use]
    pub fn with_unseeded(mut self, mask: u32) -> Self {
        self.unseeded = mask;
        self
    }

    pub fn digital(&self) -> DigitalSnapshot {
        self.digital
    }

    pub fn analog(&self) -> &[i32] {
        &self.analog
    }

    pub fn is_seeded(&self, channel: usize) -> bool {
        channel >= MAX_LINES || self.unseeded & (1u32 << channel) == 0
    }
}

/// A single discrete change notification for the event sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscreteEvent {
    /// Analog channel index (0..N-1).
    pub channel: usize,
    /// External protocol parameter id mapped from the channel.
    pub param_id: u8,
    /// Stable output value in the channel's output bounds.
    pub value: i32,
}

/// Result of a send attempt on either sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Accepted,
    Skipped,
}

impl SendOutcome {
    #[inline]
    pub fn is_accepted(self) -> bool {
        matches!(self, SendOutcome::Accepted)
    }
}

/// Logical role of a digital line, used by the gamepad report encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonRole {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    Start,
    Select,
}
