//! Core types, errors, and configuration for Wordlens.
//!
//! This crate provides the foundational types shared by the analysis
//! pipeline, the web shell, and the command-line interface: the token
//! frequency map, the ranked top-N list, the closed set of chart kinds,
//! and the session states a user moves through.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use config::WordlensConfig;
pub use error::{Error, Result};
pub use types::*;
