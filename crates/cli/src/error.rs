//! Error types for CLI operations.

use thiserror::Error;
use wordlens_analysis::AnalysisError;
use wordlens_web::WebError;

/// Main error type for CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fetching or counting failed.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The web server failed to start or stopped with an error.
    #[error("Server error: {0}")]
    Server(String),

    /// Invalid argument error.
    #[error("Invalid argument: {0}")]
    Argument(String),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

impl From<wordlens_core::Error> for CliError {
    fn from(err: wordlens_core::Error) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<WebError> for CliError {
    fn from(err: WebError) -> Self {
        CliError::Server(err.to_string())
    }
}
