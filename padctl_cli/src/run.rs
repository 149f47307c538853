//! The `run` command: assemble the controller and tick until stopped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use eyre::WrapErr;
use padctl_config::Config;
use padctl_core::conversions::{channels_from_config, lines_from_config};
use padctl_core::runner::{RunParams, RunStats, run};
use padctl_core::util::period_from_ms;
use padctl_core::{PadController, TickCfg};
use padctl_traits::MonotonicClock;
use serde_json::json;

use crate::backend::{make_scans, make_sinks};

pub struct RunOptions {
    pub ticks: Option<u64>,
    pub period_ms: Option<u64>,
    pub dry_run: bool,
    pub noise: Option<u16>,
}

pub fn run_controller(cfg: &Config, opts: &RunOptions) -> eyre::Result<RunStats> {
    let channels = channels_from_config(&cfg.analog);
    let lines = lines_from_config(&cfg.digital);
    let (analog, digital) = make_scans(cfg, &lines, opts.noise)?;
    let (continuous, events) = make_sinks(cfg, &lines, opts.dry_run)?;

    let mut controller = PadController::builder()
        .with_analog_scan(analog)
        .with_digital_scan(digital)
        .with_sinks(continuous, events)
        .with_channels(channels)
        .with_lines(lines)
        .build()?;

    let period = match opts.period_ms {
        Some(ms) => period_from_ms(ms),
        None => TickCfg::from(&cfg.tick).period,
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
            .wrap_err("install Ctrl-C handler")?;
    }

    let params = RunParams {
        period,
        max_ticks: opts.ticks,
    };
    Ok(run(&mut controller, &MonotonicClock::new(), &params, &shutdown))
}

pub fn print_stats(stats: &RunStats, json: bool) {
    if json {
        let obj = json!({
            "ticks": stats.ticks,
            "events_emitted": stats.events_emitted,
            "events_deferred": stats.events_deferred,
            "continuous_skipped": stats.continuous_skipped,
            "scan_failures": stats.scan_failures,
            "overruns": stats.overruns,
            "max_tick_us": stats.max_tick.as_micros() as u64,
        });
        println!("{obj}");
    } else {
        println!(
            "run complete: ticks={} events={} deferred={} skipped={} scan_failures={} overruns={} max_tick={:?}",
            stats.ticks,
            stats.events_emitted,
            stats.events_deferred,
            stats.continuous_skipped,
            stats.scan_failures,
            stats.overruns,
            stats.max_tick
        );
    }
}
