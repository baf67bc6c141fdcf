//! Axum router configuration for the Wordlens web shell.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use wordlens_analysis::chart::ChartRenderer;
use wordlens_analysis::pipeline::Analyzer;
use wordlens_core::WordlensConfig;

use crate::session::SessionStore;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Live sessions.
    pub sessions: SessionStore,
    /// Fetch and count stages.
    pub analyzer: Analyzer,
    /// Chart renderer configured from [`WordlensConfig::chart`].
    pub renderer: Arc<ChartRenderer>,
    /// Effective configuration.
    pub config: Arc<WordlensConfig>,
}

impl AppState {
    /// State with the HTTP fetcher and jieba counter.
    pub fn new(config: WordlensConfig) -> Self {
        Self::with_analyzer(config, Analyzer::new())
    }

    /// State with a custom analyzer.
    pub fn with_analyzer(config: WordlensConfig, analyzer: Analyzer) -> Self {
        Self {
            sessions: SessionStore::from_config(&config.session),
            analyzer,
            renderer: Arc::new(ChartRenderer::new(config.chart.clone())),
            config: Arc::new(config),
        }
    }
}

/// Build the application router: API, health check, and frontend.
pub fn build_router(state: AppState) -> Router {
    let enable_cors = state.config.http.enable_cors;

    let mut router = Router::new()
        .nest("/api", crate::api::router())
        .route("/health", get(health_check))
        .merge(crate::assets::router())
        .fallback(crate::assets::handle_404)
        .with_state(state);

    if enable_cors {
        router = router.layer(create_cors_layer());
    }

    router
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
}
