//! Analog channel conditioning: oversample, remap into an extended range,
//! EMA smoothing, hysteresis gate, quantize.
//!
//! Every channel owns an independent [`AnalogChannelState`]. The remap widens
//! the output domain by `margin` on each side before clamping, so the ends of
//! a pot's travel saturate at the rails instead of hovering just below them.
//!
//! ```text
//! burst -> raw_avg -> v in [out_min, out_max] -> filtered -> stable -> i32
//!          (mean)     (remap + clamp)            (EMA)       (gate)   (round)
//! ```

use tracing::trace;

use crate::config::ConditionerCfg;
use crate::util::{mean_round_u16, round_half_up};

/// Oversample: rounded mean of the burst, clamped to `raw_max`.
#[inline]
pub fn oversample(samples: &[u16], raw_max: u16) -> Option<u16> {
    mean_round_u16(samples).map(|m| m.min(raw_max))
}

/// Map `raw_avg` onto the extended range and clamp to the output bounds.
#[inline]
pub fn remap(raw_avg: u16, cfg: &ConditionerCfg) -> f32 {
    let norm = f32::from(raw_avg.min(cfg.raw_max)) / f32::from(cfg.raw_max.max(1));
    let lo = cfg.out_min as f32 - cfg.margin;
    let hi = cfg.out_max as f32 + cfg.margin;
    (lo + norm * (hi - lo)).clamp(cfg.out_min as f32, cfg.out_max as f32)
}

/// Clamp to the output bounds and round to nearest with ties up.
#[inline]
pub fn quantize(stable: f32, cfg: &ConditionerCfg) -> i32 {
    round_half_up(stable.clamp(cfg.out_min as f32, cfg.out_max as f32))
        .clamp(cfg.out_min, cfg.out_max)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogChannelState {
    pub raw_avg: u16,
    /// EMA output; never exposed through snapshots.
    pub filtered: f32,
    /// Last hysteresis-committed value, within the output bounds.
    pub stable: f32,
    pub initialized: bool,
}

impl AnalogChannelState {
    fn new(cfg: &ConditionerCfg) -> Self {
        let floor = cfg.out_min as f32;
        Self {
            raw_avg: 0,
            filtered: floor,
            stable: floor,
            initialized: false,
        }
    }
}

/// One channel's conditioner.
#[derive(Debug, Clone)]
pub struct ChannelConditioner {
    cfg: ConditionerCfg,
    state: AnalogChannelState,
}

impl ChannelConditioner {
    pub fn new(cfg: ConditionerCfg) -> Self {
        Self {
            state: AnalogChannelState::new(&cfg),
            cfg,
        }
    }

    pub fn cfg(&self) -> &ConditionerCfg {
        &self.cfg
    }

    pub fn state(&self) -> &AnalogChannelState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized
    }

    /// Feed one burst. An empty burst leaves the state untouched.
    pub fn process(&mut self, burst: &[u16]) -> i32 {
        if let Some(raw_avg) = oversample(burst, self.cfg.raw_max) {
            self.step(raw_avg);
        }
        self.output()
    }

    /// Advance the filter with an already averaged reading.
    pub fn step(&mut self, raw_avg: u16) {
        let v = remap(raw_avg, &self.cfg);
        let st = &mut self.state;
        st.raw_avg = raw_avg.min(self.cfg.raw_max);
        if !st.initialized {
            st.filtered = v;
            st.stable = v;
            st.initialized = true;
            return;
        }
        st.filtered += self.cfg.alpha * (v - st.filtered);
        if (st.filtered - st.stable).abs() >= self.cfg.threshold {
            st.stable = st
                .filtered
                .clamp(self.cfg.out_min as f32, self.cfg.out_max as f32);
        }
    }

    /// Current quantized stable value. The output floor until seeded.
    pub fn output(&self) -> i32 {
        quantize(self.state.stable, &self.cfg)
    }
}

/// The per-channel conditioners of a controller, in channel order.
#[derive(Debug, Clone, Default)]
pub struct Conditioner {
    channels: Vec<ChannelConditioner>,
}

impl Conditioner {
    pub fn new(cfgs: impl IntoIterator<Item = ConditionerCfg>) -> Self {
        Self {
            channels: cfgs.into_iter().map(ChannelConditioner::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel(&self, i: usize) -> Option<&ChannelConditioner> {
        self.channels.get(i)
    }

    /// Process channel `i`'s burst and return its candidate value.
    /// Out-of-range indices return `None` and touch nothing.
    pub fn process(&mut self, i: usize, burst: &[u16]) -> Option<i32> {
        let ch = self.channels.get_mut(i)?;
        let before = ch.state.stable;
        let out = ch.process(burst);
        if ch.state.stable != before {
            trace!(channel = i, value = out, raw = ch.state.raw_avg, "commit");
        }
        Some(out)
    }

    /// Candidate values for every channel.
    pub fn outputs(&self) -> Vec<i32> {
        self.channels.iter().map(ChannelConditioner::output).collect()
    }

    /// Bit `i` set while channel `i` has never been seeded.
    pub fn unseeded_mask(&self) -> u32 {
        self.channels
            .iter()
            .enumerate()
            .take(32)
            .filter(|(_, c)| !c.is_initialized())
            .fold(0, |m, (i, _)| m | (1u32 << i))
    }
}
