use thiserror::Error;

pub type Result<T> = std::result::Result<T, HwError>;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio init failed: {0}")]
    Gpio(String),
    #[error("serial error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("esptool could not be started: {0}")]
    Spawn(std::io::Error),
    #[error("esptool exited with {0}")]
    Esptool(std::process::ExitStatus),
}
