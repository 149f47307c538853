//! The `replay` command.

use std::path::Path;

use padctl_config::{Config, load_trace_csv};
use padctl_core::conversions::channels_from_config;
use padctl_core::replay::{ReplayEvent, replay};
use serde_json::json;

pub fn replay_trace(cfg: &Config, trace: &Path) -> eyre::Result<Vec<ReplayEvent>> {
    let trace = load_trace_csv(trace)?;
    let channels = channels_from_config(&cfg.analog);
    replay(&trace, &channels)
}

pub fn print_events(events: &[ReplayEvent], json: bool) {
    if !json {
        println!("tick,channel,param_id,value");
    }
    for e in events {
        if json {
            let obj = json!({
                "tick": e.tick,
                "channel": e.event.channel,
                "param_id": e.event.param_id,
                "value": e.event.value,
            });
            println!("{obj}");
        } else {
            println!(
                "{},{},{},{}",
                e.tick, e.event.channel, e.event.param_id, e.event.value
            );
        }
    }
}
