//! Error types for footlight-headless

use thiserror::Error;

/// Headless host error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Core(#[from] footlight_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
