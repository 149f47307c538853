//! Subscriber setup: console layer plus an optional rolling JSON file.

use std::path::Path;

use eyre::WrapErr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::cli::FILE_GUARD;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Console goes to stderr so stdout stays machine-readable.
/// `RUST_LOG` overrides `level` when set.
pub fn init(json: bool, level: &str, cfg: &padctl_config::Logging) -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level {level:?}"))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let console: BoxedLayer = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed()
    };
    layers.push(console);

    if let Some(file) = cfg.file.as_deref() {
        layers.push(file_layer(file, cfg)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .wrap_err("install tracing subscriber")
}

fn file_layer(file: &str, cfg: &padctl_config::Logging) -> eyre::Result<BoxedLayer> {
    let path = Path::new(file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("logging.file {file:?} has no file name"))?;

    let appender = match cfg.rotation.as_deref() {
        Some("daily") => tracing_appender::rolling::daily(dir, name),
        Some("hourly") => tracing_appender::rolling::hourly(dir, name),
        _ => tracing_appender::rolling::never(dir, name),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // Keep the worker alive for the whole process.
    let _ = FILE_GUARD.set(guard);

    let filter = EnvFilter::try_new(cfg.level.as_deref().unwrap_or("info"))
        .wrap_err("invalid logging.level")?;
    Ok(fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter)
        .boxed())
}
