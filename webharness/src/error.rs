//! Error types for webharness.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("webdriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("recording error: {0}")]
    Capture(#[from] webharness_capture::Error),

    #[error("failed to load config from {path}: {detail}")]
    Config { path: String, detail: String },

    #[error("window not found: {0}")]
    WindowNotFound(String),

    #[error("unknown session '{0}'")]
    UnknownSession(String),

    #[error("session '{0}' already registered")]
    DuplicateSession(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
