//! JSON endpoints driven by the frontend.
//!
//! Every interaction runs to completion before its response is sent: a URL
//! submission fetches and counts, a chart request ranks and renders.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use wordlens_core::ChartKind;

use crate::error::WebResult;
use crate::router::AppState;
use crate::session::{ChartView, SessionView};

/// Session and chart routes, mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id/url", post(submit_url))
        .route("/sessions/:id/chart", get(get_chart))
        .route("/chart-kinds", get(chart_kinds))
}

// ==================== Request/Response Types ====================

/// URL submission body.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitUrlRequest {
    /// Page to analyse. Blank input is ignored.
    pub url: String,
}

/// Chart controls.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChartQuery {
    /// Chart kind slug or label; defaults to the word cloud.
    pub kind: Option<String>,
    /// Minimum frequency; defaults to the initial slider value.
    pub min_freq: Option<u64>,
}

/// One selectable chart kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartKindInfo {
    /// Wire identifier.
    pub slug: String,
    /// Display label.
    pub label: String,
}

// ==================== Handler Implementations ====================

#[instrument(skip(state))]
async fn create_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.sessions.create().await)
}

#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<SessionView>> {
    state.sessions.read(&id, |s| Ok(s.view(&id))).await.map(Json)
}

#[instrument(skip(state))]
async fn submit_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubmitUrlRequest>,
) -> WebResult<Json<SessionView>> {
    let ticket = state
        .sessions
        .update(&id, |s| Ok(s.begin_fetch(&req.url)))
        .await?;

    if let Some(ticket) = ticket {
        // The store lock is not held across the fetch.
        let outcome = state.analyzer.fetch_and_count(ticket.url()).await;
        state
            .sessions
            .update(&id, |s| s.finish_fetch(ticket, outcome))
            .await?;
    }

    state.sessions.read(&id, |s| Ok(s.view(&id))).await.map(Json)
}

#[instrument(skip(state))]
async fn get_chart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ChartQuery>,
) -> WebResult<Json<ChartView>> {
    let kind = match query.kind.as_deref() {
        Some(kind) => kind.parse::<ChartKind>()?,
        None => ChartKind::default(),
    };
    let renderer = &state.renderer;

    state
        .sessions
        .read(&id, |s| s.chart(kind, query.min_freq, renderer))
        .await
        .map(Json)
}

#[instrument]
async fn chart_kinds() -> Json<Vec<ChartKindInfo>> {
    Json(
        ChartKind::ALL
            .into_iter()
            .map(|kind| ChartKindInfo {
                slug: kind.slug().to_string(),
                label: kind.label().to_string(),
            })
            .collect(),
    )
}
