//! Error types for Wordlens core functionality.

use thiserror::Error;

/// Main error type for Wordlens.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Reading or writing a file failed.
    #[error("File system error: {0}")]
    FileSystem(String),
    /// Malformed input such as a config file that is not valid TOML.
    #[error("Data parsing error: {0}")]
    Parse(String),
    /// A chart kind outside the supported set reached a parsing boundary.
    #[error("Invalid chart kind: {0}")]
    InvalidChartKind(String),
}

/// Result type for Wordlens operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
