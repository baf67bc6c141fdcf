use thiserror::Error;

/// Why a page could not be turned into text.
///
/// Every variant carries a message suitable for showing to the user as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        /// URL as submitted.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// Connection, DNS, TLS, or redirect failure.
    #[error("request to {url} failed: {reason}")]
    Network {
        /// URL as submitted.
        url: String,
        /// Client message.
        reason: String,
    },
    /// The server answered with a non-success status.
    #[error("{url} answered with HTTP {status}")]
    Status {
        /// URL as submitted.
        url: String,
        /// Response status code.
        status: u16,
    },
    /// The response body could not be read.
    #[error("failed to read response body from {url}: {reason}")]
    Body {
        /// URL as submitted.
        url: String,
        /// Client message.
        reason: String,
    },
}

/// Errors that can occur during analysis operations.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Page fetch failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    /// The segmentation task did not complete.
    #[error("Segmentation error: {0}")]
    Segmentation(String),
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
