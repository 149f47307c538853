//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "padctl", version, about = "Control panel scanner and dispatcher")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/padctl.toml")]
    pub config: PathBuf,

    /// Log and print results as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan and dispatch at the configured tick period until Ctrl-C
    Run {
        /// Stop after this many ticks
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Override tick.period_ms
        #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..=1000))]
        period_ms: Option<u64>,
        /// Send everything to the log instead of the configured devices
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
        /// Override simulation.noise (raw counts, simulated backend only)
        #[arg(long, value_name = "COUNTS")]
        noise: Option<u16>,
    },
    /// Replay a raw-sample trace (CSV: tick,channel,raw) and print emitted events
    Replay {
        /// Trace CSV file (strict header)
        #[arg(long, value_name = "FILE")]
        trace: PathBuf,
    },
    /// Read every channel and line once and print the raw values
    SelfCheck,
}
