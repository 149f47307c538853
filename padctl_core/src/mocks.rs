//! Test and helper mocks for padctl_core.
//!
//! Both mocks are cheap handles over shared state: clone one into the
//! controller and keep the other to drive or inspect it.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::Rc;

use padctl_traits::{
    AnalogScan, ContinuousSink, ControllerSnapshot, DigitalScan, DiscreteEvent, EventSink,
    SendOutcome,
};

#[derive(Debug, Default)]
struct ScanState {
    levels: BTreeMap<usize, u16>,
    queued: BTreeMap<usize, VecDeque<u16>>,
    lines: BTreeMap<usize, bool>,
    failing_inputs: BTreeSet<usize>,
    failing_lines: BTreeSet<usize>,
}

/// Scan source with programmable analog levels and line levels.
///
/// Queued samples for an input are served first, then its steady level.
/// Inputs and lines never set read as 0 / low.
#[derive(Debug, Clone, Default)]
pub struct ScriptedScan {
    state: Rc<RefCell<ScanState>>,
}

impl ScriptedScan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_level(&self, input: usize, raw: u16) {
        self.state.borrow_mut().levels.insert(input, raw);
    }

    pub fn queue(&self, input: usize, samples: impl IntoIterator<Item = u16>) {
        self.state
            .borrow_mut()
            .queued
            .entry(input)
            .or_default()
            .extend(samples);
    }

    pub fn set_line(&self, pin: usize, high: bool) {
        self.state.borrow_mut().lines.insert(pin, high);
    }

    pub fn fail_input(&self, input: usize, failing: bool) {
        let mut st = self.state.borrow_mut();
        if failing {
            st.failing_inputs.insert(input);
        } else {
            st.failing_inputs.remove(&input);
        }
    }

    pub fn fail_line(&self, pin: usize, failing: bool) {
        let mut st = self.state.borrow_mut();
        if failing {
            st.failing_lines.insert(pin);
        } else {
            st.failing_lines.remove(&pin);
        }
    }
}

impl AnalogScan for ScriptedScan {
    fn scan_analog(
        &mut self,
        channel: usize,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let mut st = self.state.borrow_mut();
        if st.failing_inputs.contains(&channel) {
            return Err(Box::new(std::io::Error::other("scripted analog failure")));
        }
        if let Some(v) = st.queued.get_mut(&channel).and_then(VecDeque::pop_front) {
            return Ok(v);
        }
        Ok(st.levels.get(&channel).copied().unwrap_or(0))
    }
}

impl DigitalScan for ScriptedScan {
    fn scan_digital(
        &mut self,
        line: usize,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let st = self.state.borrow();
        if st.failing_lines.contains(&line) {
            return Err(Box::new(std::io::Error::other("scripted line failure")));
        }
        Ok(st.lines.get(&line).copied().unwrap_or(false))
    }
}

#[derive(Debug)]
struct SinkState {
    continuous_ready: bool,
    event_connected: bool,
    accept_events: bool,
    snapshots: Vec<ControllerSnapshot>,
    events: Vec<DiscreteEvent>,
    event_attempts: usize,
}

/// Records everything it accepts; implements both sink roles.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    state: Rc<RefCell<SinkState>>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SinkState {
                continuous_ready: true,
                event_connected: true,
                accept_events: true,
                snapshots: Vec::new(),
                events: Vec::new(),
                event_attempts: 0,
            })),
        }
    }

    pub fn set_continuous_ready(&self, ready: bool) {
        self.state.borrow_mut().continuous_ready = ready;
    }

    pub fn set_event_connected(&self, connected: bool) {
        self.state.borrow_mut().event_connected = connected;
    }

    /// While false, `send_event` reports `Skipped` even when connected
    /// (e.g. a full transmit buffer).
    pub fn set_accept_events(&self, accept: bool) {
        self.state.borrow_mut().accept_events = accept;
    }

    pub fn snapshots(&self) -> Vec<ControllerSnapshot> {
        self.state.borrow().snapshots.clone()
    }

    pub fn events(&self) -> Vec<DiscreteEvent> {
        self.state.borrow().events.clone()
    }

    /// Calls to `send_event`, accepted or not.
    pub fn event_attempts(&self) -> usize {
        self.state.borrow().event_attempts
    }
}

impl ContinuousSink for RecordingSink {
    fn ready(&self) -> bool {
        self.state.borrow().continuous_ready
    }

    fn send(&mut self, snapshot: &ControllerSnapshot) -> SendOutcome {
        let mut st = self.state.borrow_mut();
        if !st.continuous_ready {
            return SendOutcome::Skipped;
        }
        st.snapshots.push(snapshot.clone());
        SendOutcome::Accepted
    }
}

impl EventSink for RecordingSink {
    fn connected(&self) -> bool {
        self.state.borrow().event_connected
    }

    fn send_event(&mut self, event: DiscreteEvent) -> SendOutcome {
        let mut st = self.state.borrow_mut();
        st.event_attempts += 1;
        if !(st.event_connected && st.accept_events) {
            return SendOutcome::Skipped;
        }
        st.events.push(event);
        SendOutcome::Accepted
    }
}
