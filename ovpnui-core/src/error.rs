//! Error types for OpenVPN UI

use thiserror::Error;

/// Result type for OpenVPN UI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for OpenVPN UI
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration document error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Application settings error
    #[error("Settings error: {0}")]
    Settings(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
