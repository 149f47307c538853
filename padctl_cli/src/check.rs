//! The `self-check` command: one burst per channel and one read per line.

use padctl_config::Config;
use padctl_core::conditioner::{oversample, remap};
use padctl_core::conversions::{channels_from_config, lines_from_config};
use padctl_core::digital::normalize;
use padctl_core::hw_error::map_hw_error;
use padctl_traits::{AnalogScan, DigitalScan};
use serde_json::json;

use crate::backend::make_scans;

pub fn self_check(cfg: &Config, json: bool) -> eyre::Result<()> {
    let channels = channels_from_config(&cfg.analog);
    let lines = lines_from_config(&cfg.digital);
    let (mut analog, mut digital) = make_scans(cfg, &lines, None)?;

    let mut failures = 0usize;
    let mut chan_out = Vec::with_capacity(channels.len());
    for (i, ch) in channels.iter().enumerate() {
        let mut burst = Vec::with_capacity(ch.conditioner.oversample);
        let mut error = None;
        for _ in 0..ch.conditioner.oversample {
            match analog.scan_analog(ch.input) {
                Ok(raw) => burst.push(raw),
                Err(e) => error = Some(map_hw_error(e.as_ref()).to_string()),
            }
        }
        let raw_avg = oversample(&burst, ch.conditioner.raw_max);
        let value = raw_avg.map(|r| remap(r, &ch.conditioner));
        if error.is_some() {
            failures += 1;
        }
        chan_out.push((i, ch.input, ch.param_id, raw_avg, value, error));
    }

    let mut line_out = Vec::with_capacity(lines.len());
    for (bit, line) in lines.iter().enumerate() {
        match digital.scan_digital(line.pin) {
            Ok(high) => line_out.push((bit, line.pin, Some(high), normalize(high, line.active_low))),
            Err(e) => {
                failures += 1;
                tracing::warn!(pin = line.pin, error = %map_hw_error(e.as_ref()), "line read failed");
                line_out.push((bit, line.pin, None, false));
            }
        }
    }

    if json {
        let chans: Vec<_> = chan_out
            .iter()
            .map(|(i, input, param_id, raw, value, error)| {
                json!({ "channel": i, "input": input, "param_id": param_id,
                        "raw_avg": raw, "value": value, "error": error })
            })
            .collect();
        let lns: Vec<_> = line_out
            .iter()
            .map(|(bit, pin, high, engaged)| {
                json!({ "bit": bit, "pin": pin, "high": high, "engaged": engaged })
            })
            .collect();
        println!(
            "{}",
            json!({ "ok": failures == 0, "channels": chans, "lines": lns })
        );
    } else {
        for (i, input, param_id, raw, value, error) in &chan_out {
            match (raw, value) {
                (Some(raw), Some(v)) => println!(
                    "channel {i}: input={input} param_id={param_id} raw_avg={raw} value={v:.2}"
                ),
                _ => println!(
                    "channel {i}: input={input} param_id={param_id} FAILED ({})",
                    error.as_deref().unwrap_or("no samples")
                ),
            }
        }
        for (bit, pin, high, engaged) in &line_out {
            match high {
                Some(h) => println!(
                    "line {bit}: pin={pin} level={} engaged={engaged}",
                    if *h { "high" } else { "low" }
                ),
                None => println!("line {bit}: pin={pin} FAILED"),
            }
        }
        println!("{}", if failures == 0 { "self-check ok" } else { "self-check found failures" });
    }

    if failures > 0 {
        eyre::bail!("self-check failed: {failures} input(s) could not be read");
    }
    Ok(())
}
