use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum PadError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing scan source")]
    MissingScan,
    #[error("missing continuous sink")]
    MissingContinuousSink,
    #[error("missing event sink")]
    MissingEventSink,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
