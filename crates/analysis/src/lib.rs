//! Fetch, segmentation, ranking, and chart rendering for Wordlens.
//!
//! The stages are independent and run in order: [`fetch`] turns a URL into
//! visible text (via [`extract`]), [`nlp`] counts qualifying tokens,
//! [`rank`] picks the top words above a threshold, and [`chart`] turns the
//! ranking into embeddable ECharts markup. [`pipeline`] wires the first two
//! stages together for callers that hold per-session state.

#![deny(unsafe_code)]

/// Page fetching over HTTP.
pub mod fetch;

/// HTML to visible text extraction.
pub mod extract;

/// Word segmentation and frequency counting.
pub mod nlp;

/// Threshold filtering and top-N ranking.
pub mod rank;

/// Chart markup rendering.
pub mod chart;

/// Fetch-then-count orchestration.
pub mod pipeline;

/// Error types for analysis operations.
pub mod error;

pub use error::{AnalysisError, AnalysisResult, FetchError};
