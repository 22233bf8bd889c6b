use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum LinkError {
    #[error("not connected")]
    NotConnected,
    #[error("serial open failed: {0}")]
    Open(String),
    #[error("serial write failed: {0}")]
    Write(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
