//! Error types for xxupack

use std::fmt;

/// Main error type for xxupack operations
#[derive(Debug)]
pub enum XxuError {
    /// Invalid configuration value (unknown preset, malformed version, ...)
    ConfigError(String),

    /// Input hex file could not be opened or read
    InputError(String),

    /// Output file could not be opened or written
    OutputError(String),

    /// Firmware payload rejected (strict high-bit mode)
    PayloadError(String),

    /// IO error
    IoError(std::io::Error),

    /// Generic error with message
    Generic(String),
}

impl fmt::Display for XxuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XxuError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            XxuError::InputError(msg) => write!(f, "Input error: {msg}"),
            XxuError::OutputError(msg) => write!(f, "Output error: {msg}"),
            XxuError::PayloadError(msg) => write!(f, "Payload error: {msg}"),
            XxuError::IoError(err) => write!(f, "IO error: {err}"),
            XxuError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for XxuError {}

impl From<std::io::Error> for XxuError {
    fn from(err: std::io::Error) -> Self {
        XxuError::IoError(err)
    }
}

impl From<anyhow::Error> for XxuError {
    fn from(err: anyhow::Error) -> Self {
        XxuError::Generic(err.to_string())
    }
}

/// Result type for xxupack operations
pub type Result<T> = std::result::Result<T, XxuError>;
