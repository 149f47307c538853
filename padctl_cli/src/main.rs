#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod backend;
mod check;
mod cli;
mod error_fmt;
mod logging;
mod replay;
mod run;

use std::path::Path;

use clap::Parser;
use eyre::WrapErr;
use padctl_config::Config;
use padctl_core::error::PadError;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::run::RunOptions;

fn load_config(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    let cfg = padctl_config::load_toml(&text)
        .map_err(|e| eyre::Report::new(PadError::Config(format!("parse {}: {e}", path.display()))))?;
    cfg.validate()
        .map_err(|e| eyre::Report::new(PadError::Config(e.to_string())))?;
    Ok(cfg)
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(&cli.config)?;
    logging::init(cli.json, &cli.log_level, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    match cli.cmd {
        Commands::Run {
            ticks,
            period_ms,
            dry_run,
            noise,
        } => {
            let opts = RunOptions {
                ticks,
                period_ms,
                dry_run,
                noise,
            };
            let stats = run::run_controller(&cfg, &opts)?;
            run::print_stats(&stats, cli.json);
        }
        Commands::Replay { trace } => {
            let events = replay::replay_trace(&cfg, &trace)?;
            replay::print_events(&events, cli.json);
        }
        Commands::SelfCheck => check::self_check(&cfg, cli.json)?,
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;
    let _ = JSON_MODE.set(json);
    let _ = color_eyre::install();

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}
