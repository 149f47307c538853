//! `From` implementations bridging `padctl_config` types to `padctl_core` types.

use padctl_traits::ButtonRole;

use crate::config::{ChannelCfg, ConditionerCfg, DispatchCfg, LineCfg, TickCfg};
use crate::util::period_from_ms;

// ── ConditionerCfg ───────────────────────────────────────────────────────────

impl From<&padctl_config::AnalogCfg> for ConditionerCfg {
    fn from(c: &padctl_config::AnalogCfg) -> Self {
        Self {
            raw_max: c.raw_max,
            out_min: c.out_min,
            out_max: c.out_max,
            margin: c.margin,
            oversample: c.oversample as usize,
            alpha: c.alpha,
            threshold: c.threshold,
        }
    }
}

/// Resolve every configured channel against the `[analog]` defaults.
pub fn channels_from_config(analog: &padctl_config::AnalogCfg) -> Vec<ChannelCfg> {
    let base = ConditionerCfg::from(analog);
    analog
        .channels
        .iter()
        .map(|ch| {
            let mut cond = base;
            if let Some(n) = ch.oversample {
                cond.oversample = n as usize;
            }
            if let Some(a) = ch.alpha {
                cond.alpha = a;
            }
            if let Some(t) = ch.threshold {
                cond.threshold = t;
            }
            if let Some(m) = ch.margin {
                cond.margin = m;
            }
            ChannelCfg::new(ch.input, ch.param_id).with_conditioner(cond)
        })
        .collect()
}

// ── LineCfg ──────────────────────────────────────────────────────────────────

fn role_from_config(r: padctl_config::LineRole) -> ButtonRole {
    use padctl_config::LineRole as R;
    match r {
        R::Up => ButtonRole::Up,
        R::Down => ButtonRole::Down,
        R::Left => ButtonRole::Left,
        R::Right => ButtonRole::Right,
        R::A => ButtonRole::A,
        R::B => ButtonRole::B,
        R::Start => ButtonRole::Start,
        R::Select => ButtonRole::Select,
    }
}

impl From<&padctl_config::LineCfg> for LineCfg {
    fn from(c: &padctl_config::LineCfg) -> Self {
        Self {
            pin: usize::from(c.pin),
            active_low: c.active_low,
            role: c.role.map(role_from_config),
        }
    }
}

pub fn lines_from_config(digital: &padctl_config::DigitalCfg) -> Vec<LineCfg> {
    digital.lines.iter().map(LineCfg::from).collect()
}

// ── DispatchCfg / TickCfg ────────────────────────────────────────────────────

impl From<&padctl_config::DispatchCfg> for DispatchCfg {
    fn from(c: &padctl_config::DispatchCfg) -> Self {
        Self {
            midi_channel: c.midi_channel,
        }
    }
}

impl From<&padctl_config::TickCfg> for TickCfg {
    fn from(c: &padctl_config::TickCfg) -> Self {
        Self {
            period: period_from_ms(c.period_ms),
        }
    }
}
