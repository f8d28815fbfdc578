//! Error types for webharness-capture.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("encoder error: {0}")]
    Encoder(String),

    #[error("invalid recorder config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
