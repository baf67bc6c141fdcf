//! Embedded single-page frontend.

use axum::{
    http::{StatusCode, Uri},
    response::Html,
    routing::get,
    Router,
};

use crate::router::AppState;

/// The page is compiled into the binary; there is nothing to serve from disk.
const INDEX_HTML: &str = include_str!("../frontend/index.html");

/// Routes serving the frontend.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// 404 handler for unknown paths.
pub async fn handle_404(uri: Uri) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("No route for {}", uri.path()),
    )
}
