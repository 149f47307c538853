use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("spi error: {0}")]
    Spi(String),
    #[error("analog channel {0} out of range")]
    ChannelOutOfRange(usize),
    #[error("digital line {0} not configured")]
    LineOutOfRange(usize),
    #[error("simulated fault on {0}")]
    Injected(&'static str),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
