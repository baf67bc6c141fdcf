//! Error types for the Wordlens web shell.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;
use wordlens_analysis::AnalysisError;

/// Main error type for web operations.
#[derive(Error, Debug)]
pub enum WebError {
    /// No session with the given id.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The session is not in a state that allows the request.
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// Core Wordlens error.
    #[error("Core error: {0}")]
    Core(#[from] wordlens_core::Error),

    /// Analysis pipeline error.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for web operations.
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    /// Convert to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            WebError::InvalidState(_) => StatusCode::CONFLICT,
            WebError::Core(wordlens_core::Error::InvalidChartKind(_)) => StatusCode::BAD_REQUEST,
            WebError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Analysis(AnalysisError::Fetch(_)) => StatusCode::BAD_GATEWAY,
            WebError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<WebError> for axum::response::Response {
    fn from(error: WebError) -> Self {
        let status = error.status_code();
        let body = serde_json::json!({
            "error": error.to_string(),
            "code": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        self.into()
    }
}
