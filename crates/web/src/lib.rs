//! Web UI shell for Wordlens.
//!
//! Serves the single-page UI and the JSON endpoints it drives. Each browser
//! tab owns one [`session::Session`] that moves from idle to ready as a URL
//! is submitted; chart controls only re-rank and re-render the counts the
//! session already holds.

#![deny(unsafe_code)]

/// Embedded single-page frontend.
pub mod assets;

/// Per-user session state machine and store.
pub mod session;

/// JSON endpoints driven by the frontend.
pub mod api;

/// Router assembly.
pub mod router;

/// HTTP server with graceful shutdown.
pub mod server;

/// Error types for web operations.
pub mod error;

pub use error::{WebError, WebResult};
pub use router::{build_router, AppState};
pub use server::{start_server, WebServer};
