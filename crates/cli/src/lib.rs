//! Command-line interface for Wordlens.
//!
//! `wordlens serve` starts the web UI; `wordlens analyze` runs the pipeline
//! once for a URL and prints the ranking.

#![deny(missing_docs, unsafe_code)]

/// CLI command definitions and parsing.
pub mod commands;

/// CLI application entry point and configuration.
pub mod app;

/// Error types for CLI operations.
pub mod error;
