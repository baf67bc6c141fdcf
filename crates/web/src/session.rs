//! Per-user session state machine and store.
//!
//! ```text
//! Idle --submit--> FetchedEmpty | Ready
//! FetchedEmpty | Ready --submit new URL--> FetchedEmpty | Ready
//! Ready --chart controls--> Ready   (re-rank and re-render only)
//! ```
//!
//! No transition returns to `Idle`; a fresh session starts there.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use wordlens_analysis::chart::ChartRenderer;
use wordlens_analysis::rank::{rank, ThresholdBounds};
use wordlens_analysis::{AnalysisError, AnalysisResult};
use wordlens_core::config::SessionConfig;
use wordlens_core::{ChartKind, RankedWords, SessionState, TokenFrequencyMap};

use crate::error::{WebError, WebResult};

/// Shown once a page was fetched and produced tokens.
pub const FETCH_SUCCESS_MESSAGE: &str = "文章已成功抓取并处理！";

/// Prefix for fetch failures shown to the user.
pub const FETCH_ERROR_PREFIX: &str = "无法抓取文章";

/// Opaque session identifier.
pub type SessionId = String;

/// One user's analysis state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    url: Option<String>,
    /// Latest URL handed out by [`Session::begin_fetch`].
    requested: Option<String>,
    /// Bumped on every fetch; only the newest fetch may land.
    generation: u64,
    counts: TokenFrequencyMap,
    bounds: Option<ThresholdBounds>,
    error: Option<String>,
}

/// A fetch in flight for one session, returned by [`Session::begin_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    url: String,
}

impl FetchTicket {
    /// Trimmed URL to fetch.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// What the frontend needs to draw the sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    /// Session id.
    pub id: SessionId,
    /// Current state.
    pub state: SessionState,
    /// Last submitted URL.
    pub url: Option<String>,
    /// Success notice, present when ready.
    pub message: Option<String>,
    /// Fetch failure shown to the user.
    pub error: Option<String>,
    /// Number of distinct tokens.
    pub distinct_tokens: usize,
    /// Number of counted tokens.
    pub total_tokens: u64,
    /// Threshold slider bounds, present when ready.
    pub bounds: Option<ThresholdBounds>,
}

/// One rendered chart request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartView {
    /// Chart kind rendered.
    pub kind: ChartKind,
    /// Threshold applied to the ranking.
    pub min_freq: u64,
    /// Ranked words fed to the chart.
    pub words: RankedWords,
    /// Standalone chart page, `None` when nothing met the threshold.
    pub html: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn counts(&self) -> &TokenFrequencyMap {
        &self.counts
    }

    /// Whether submitting `url` should trigger a fetch.
    ///
    /// Blank input and the most recently submitted URL are no-ops.
    pub fn needs_fetch(&self, url: &str) -> bool {
        let url = url.trim();
        !url.is_empty() && self.requested.as_deref() != Some(url)
    }

    /// Record a submission of `url`, returning a ticket when it must be fetched.
    ///
    /// Every ticket supersedes the ones handed out before it.
    pub fn begin_fetch(&mut self, url: &str) -> Option<FetchTicket> {
        if !self.needs_fetch(url) {
            return None;
        }
        let url = url.trim().to_string();
        self.generation += 1;
        self.requested = Some(url.clone());
        Some(FetchTicket {
            generation: self.generation,
            url,
        })
    }

    /// Land the outcome of a fetch started with [`Session::begin_fetch`].
    ///
    /// Outcomes of superseded tickets are dropped, so overlapping submissions
    /// settle on the last URL submitted whatever order they finish in.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: AnalysisResult<TokenFrequencyMap>,
    ) -> WebResult<SessionState> {
        if ticket.generation != self.generation {
            debug!(url = %ticket.url, "superseded fetch dropped");
            return Ok(self.state);
        }
        let result = self.apply_fetch(&ticket.url, outcome);
        if result.is_err() {
            // Let the same URL be submitted again.
            self.requested = self.url.clone();
        }
        result
    }

    /// Apply the outcome of fetching and counting `url`.
    ///
    /// A fetch failure is reported through the session and leaves it in
    /// `FetchedEmpty`. Any other analysis failure is returned to the caller
    /// and the session is left untouched.
    fn apply_fetch(
        &mut self,
        url: &str,
        outcome: AnalysisResult<TokenFrequencyMap>,
    ) -> WebResult<SessionState> {
        let url = url.trim().to_string();
        match outcome {
            Ok(counts) => {
                self.bounds = ThresholdBounds::for_map(&counts);
                self.state = if counts.is_empty() {
                    SessionState::FetchedEmpty
                } else {
                    SessionState::Ready
                };
                self.counts = counts;
                self.error = None;
            }
            Err(AnalysisError::Fetch(err)) => {
                warn!(url = %url, error = %err, "fetch failed");
                self.state = SessionState::FetchedEmpty;
                self.counts = TokenFrequencyMap::new();
                self.bounds = None;
                self.error = Some(format!("{}: {}", FETCH_ERROR_PREFIX, err));
            }
            Err(other) => return Err(other.into()),
        }
        self.requested = Some(url.clone());
        self.url = Some(url);
        Ok(self.state)
    }

    /// Rank the held counts and render them.
    ///
    /// `min_freq` defaults to the initial slider value and is raised to at
    /// least 1. A threshold above every count yields no chart, not an error.
    /// Only valid in `Ready`.
    pub fn chart(
        &self,
        kind: ChartKind,
        min_freq: Option<u64>,
        renderer: &ChartRenderer,
    ) -> WebResult<ChartView> {
        let bounds = match (self.state, self.bounds) {
            (SessionState::Ready, Some(bounds)) => bounds,
            (state, _) => {
                return Err(WebError::InvalidState(format!(
                    "charts need a ready session, this one is {:?}",
                    state
                )))
            }
        };

        let min_freq = min_freq.unwrap_or(bounds.initial).max(bounds.min);
        let words = rank(&self.counts, min_freq);
        let html = if words.is_empty() {
            None
        } else {
            Some(renderer.render_page(kind, &words))
        };
        debug!(%kind, min_freq, words = words.len(), "chart rendered");

        Ok(ChartView {
            kind,
            min_freq,
            words,
            html,
        })
    }

    /// Snapshot for the frontend.
    pub fn view(&self, id: &str) -> SessionView {
        SessionView {
            id: id.to_string(),
            state: self.state,
            url: self.url.clone(),
            message: (self.state == SessionState::Ready).then(|| FETCH_SUCCESS_MESSAGE.to_string()),
            error: self.error.clone(),
            distinct_tokens: self.counts.len(),
            total_tokens: self.counts.total_tokens(),
            bounds: self.bounds,
        }
    }
}

/// In-memory map of live sessions. Nothing is persisted.
///
/// Sessions untouched for longer than the TTL are dropped, and once the
/// store is full the least recently used one makes room for a new one.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, StoredSession>>>,
    epoch: Instant,
    ttl: Duration,
    max_sessions: usize,
}

#[derive(Debug)]
struct StoredSession {
    session: Session,
    /// Milliseconds since the store epoch.
    touched: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given idle TTL and capacity.
    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            epoch: Instant::now(),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Store limited by `config`.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::with_limits(Duration::from_secs(config.ttl_secs), config.max_sessions)
    }

    fn now(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn is_expired(&self, stored: &StoredSession, now: u64) -> bool {
        let idle = now.saturating_sub(stored.touched.load(Ordering::Relaxed));
        u128::from(idle) > self.ttl.as_millis()
    }

    /// Start a new idle session, evicting expired and surplus sessions first.
    pub async fn create(&self) -> SessionView {
        let id = new_session_id();
        let session = Session::new();
        let view = session.view(&id);

        let mut sessions = self.sessions.write().await;
        let now = self.now();
        let before = sessions.len();
        sessions.retain(|_, stored| !self.is_expired(stored, now));
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, stored)| stored.touched.load(Ordering::Relaxed))
                .map(|(id, _)| id.clone());
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                }
                None => break,
            }
        }
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, live = sessions.len(), "sessions evicted");
        }

        sessions.insert(
            id.clone(),
            StoredSession {
                session,
                touched: AtomicU64::new(now),
            },
        );
        info!(session = %id, "session created");
        view
    }

    /// Run `f` against the session with `id` under the read lock.
    pub async fn read<T>(&self, id: &str, f: impl FnOnce(&Session) -> WebResult<T>) -> WebResult<T> {
        let sessions = self.sessions.read().await;
        let now = self.now();
        let stored = sessions
            .get(id)
            .filter(|stored| !self.is_expired(stored, now))
            .ok_or_else(|| WebError::SessionNotFound(id.to_string()))?;
        stored.touched.store(now, Ordering::Relaxed);
        f(&stored.session)
    }

    /// Run `f` against the session with `id` under the write lock.
    pub async fn update<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> WebResult<T>,
    ) -> WebResult<T> {
        let mut sessions = self.sessions.write().await;
        let now = self.now();
        if sessions
            .get(id)
            .is_some_and(|stored| self.is_expired(stored, now))
        {
            sessions.remove(id);
        }
        let stored = sessions
            .get_mut(id)
            .ok_or_else(|| WebError::SessionNotFound(id.to_string()))?;
        stored.touched.store(now, Ordering::Relaxed);
        f(&mut stored.session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

fn new_session_id() -> SessionId {
    format!("{:016x}{:016x}", fastrand::u64(..), fastrand::u64(..))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordlens_analysis::FetchError;

    fn counts(pairs: &[(&str, u64)]) -> TokenFrequencyMap {
        pairs
            .iter()
            .map(|(word, count)| (word.to_string(), *count))
            .collect()
    }

    fn ready_session() -> Session {
        let mut session = Session::new();
        session
            .apply_fetch(
                "http://example.test/a",
                Ok(counts(&[("分析", 5), ("文本", 3), ("测试", 1)])),
            )
            .unwrap();
        session
    }

    #[test]
    fn new_session_is_idle_and_has_no_chart() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);
        let err = session
            .chart(ChartKind::Bar, None, &ChartRenderer::default())
            .unwrap_err();
        assert!(matches!(err, WebError::InvalidState(_)));
    }

    #[test]
    fn tokens_make_session_ready() {
        let session = ready_session();
        assert_eq!(session.state(), SessionState::Ready);

        let view = session.view("abc");
        assert_eq!(view.message.as_deref(), Some(FETCH_SUCCESS_MESSAGE));
        assert_eq!(view.error, None);
        assert_eq!(view.distinct_tokens, 3);
        assert_eq!(view.total_tokens, 9);
        let bounds = view.bounds.unwrap();
        assert_eq!((bounds.min, bounds.max, bounds.initial), (1, 5, 5));
    }

    #[test]
    fn empty_counts_mean_fetched_empty() {
        let mut session = Session::new();
        let state = session
            .apply_fetch("http://example.test/blank", Ok(TokenFrequencyMap::new()))
            .unwrap();
        assert_eq!(state, SessionState::FetchedEmpty);
        assert_eq!(session.view("x").bounds, None);
        assert_eq!(session.view("x").message, None);
    }

    #[test]
    fn fetch_error_is_reported_not_raised() {
        let mut session = Session::new();
        let err = FetchError::Network {
            url: "http://unreachable.test/".into(),
            reason: "connection refused".into(),
        };
        let state = session
            .apply_fetch("http://unreachable.test/", Err(err.into()))
            .unwrap();

        assert_eq!(state, SessionState::FetchedEmpty);
        let view = session.view("x");
        let message = view.error.expect("error is shown to the user");
        assert!(message.starts_with(FETCH_ERROR_PREFIX));
        assert!(message.contains("connection refused"));
        assert_eq!(view.distinct_tokens, 0);
    }

    #[test]
    fn segmentation_failure_propagates_and_keeps_state() {
        let mut session = ready_session();
        let err = session
            .apply_fetch(
                "http://example.test/b",
                Err(AnalysisError::Segmentation("task panicked".into())),
            )
            .unwrap_err();

        assert!(matches!(err, WebError::Analysis(_)));
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.url(), Some("http://example.test/a"));
    }

    #[test]
    fn ready_chart_applies_threshold() {
        let session = ready_session();
        let view = session
            .chart(ChartKind::Bar, Some(3), &ChartRenderer::default())
            .unwrap();

        assert_eq!(view.min_freq, 3);
        assert_eq!(view.words.words(), vec!["分析", "文本"]);
        let html = view.html.expect("two words meet the threshold");
        assert!(html.contains("分析") && html.contains("文本"));
        assert!(!html.contains("测试"));
    }

    #[test]
    fn default_threshold_is_initial_slider_value() {
        let session = ready_session();
        let view = session
            .chart(ChartKind::Scatter, None, &ChartRenderer::default())
            .unwrap();
        assert_eq!(view.min_freq, 5);
        assert_eq!(view.words.words(), vec!["分析"]);
    }

    #[test]
    fn zero_threshold_is_raised_to_one() {
        let session = ready_session();
        let view = session
            .chart(ChartKind::Pie, Some(0), &ChartRenderer::default())
            .unwrap();
        assert_eq!(view.min_freq, 1);
        assert_eq!(view.words.len(), 3);
    }

    #[test]
    fn threshold_above_every_count_has_no_chart() {
        let session = ready_session();
        let view = session
            .chart(ChartKind::WordCloud, Some(6), &ChartRenderer::default())
            .unwrap();
        assert_eq!(view.min_freq, 6);
        assert!(view.words.is_empty());
        assert_eq!(view.html, None);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn resubmitting_same_url_does_not_refetch() {
        let session = ready_session();
        assert!(!session.needs_fetch("http://example.test/a"));
        assert!(!session.needs_fetch("  http://example.test/a "));
        assert!(!session.needs_fetch("   "));
        assert!(session.needs_fetch("http://example.test/other"));
        assert!(Session::new().needs_fetch("http://example.test/a"));
    }

    #[test]
    fn new_url_moves_ready_to_fetched_empty() {
        let mut session = ready_session();
        session
            .apply_fetch("http://example.test/empty", Ok(TokenFrequencyMap::new()))
            .unwrap();
        assert_eq!(session.state(), SessionState::FetchedEmpty);
        assert!(session.counts().is_empty());
    }

    #[test]
    fn superseded_fetch_does_not_land() {
        let mut session = Session::new();
        let old = session.begin_fetch("http://old.test/").unwrap();
        let new = session.begin_fetch("http://new.test/").unwrap();
        assert_eq!(new.url(), "http://new.test/");

        session
            .finish_fetch(new, Ok(counts(&[("分析", 2)])))
            .unwrap();
        session
            .finish_fetch(old, Ok(counts(&[("旧文", 9)])))
            .unwrap();

        assert_eq!(session.url(), Some("http://new.test/"));
        assert_eq!(session.counts().get("分析"), Some(2));
        assert_eq!(session.counts().get("旧文"), None);
    }

    #[test]
    fn superseded_fetch_finishing_first_is_dropped() {
        let mut session = Session::new();
        let old = session.begin_fetch("http://old.test/").unwrap();
        let new = session.begin_fetch("http://new.test/").unwrap();

        let state = session
            .finish_fetch(old, Ok(counts(&[("旧文", 9)])))
            .unwrap();
        assert_eq!(state, SessionState::Idle);
        assert_eq!(session.url(), None);

        session
            .finish_fetch(new, Ok(counts(&[("分析", 2)])))
            .unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.url(), Some("http://new.test/"));
    }

    #[test]
    fn in_flight_url_is_not_fetched_twice() {
        let mut session = Session::new();
        assert!(session.begin_fetch(" http://a.test/ ").is_some());
        assert!(session.begin_fetch("http://a.test/").is_none());
        assert!(session.begin_fetch("").is_none());
    }

    #[test]
    fn failed_count_allows_resubmitting_the_url() {
        let mut session = ready_session();
        let ticket = session.begin_fetch("http://example.test/b").unwrap();
        session
            .finish_fetch(ticket, Err(AnalysisError::Segmentation("task panicked".into())))
            .unwrap_err();

        assert_eq!(session.url(), Some("http://example.test/a"));
        assert!(session.needs_fetch("http://example.test/b"));
        assert!(!session.needs_fetch("http://example.test/a"));
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = SessionStore::with_limits(Duration::from_millis(20), 16);
        let view = store.create().await;
        assert!(store.read(&view.id, |s| Ok(s.state())).await.is_ok());

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(matches!(
            store.read(&view.id, |s| Ok(s.state())).await,
            Err(WebError::SessionNotFound(_))
        ));
        assert!(matches!(
            store.update(&view.id, |s| Ok(s.state())).await,
            Err(WebError::SessionNotFound(_))
        ));

        store.create().await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn full_store_evicts_least_recently_used() {
        let store = SessionStore::with_limits(Duration::from_secs(3600), 2);
        let first = store.create().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = store.create().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.read(&first.id, |_| Ok(())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let third = store.create().await;

        assert_eq!(store.len().await, 2);
        assert!(store.read(&first.id, |_| Ok(())).await.is_ok());
        assert!(store.read(&third.id, |_| Ok(())).await.is_ok());
        assert!(matches!(
            store.read(&second.id, |_| Ok(())).await,
            Err(WebError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn store_creates_and_updates_sessions() {
        let store = SessionStore::new();
        let view = store.create().await;
        assert_eq!(view.state, SessionState::Idle);
        assert_eq!(view.id.len(), 32);
        assert_eq!(store.len().await, 1);
        assert!(!store.is_empty().await);

        store
            .update(&view.id, |s| {
                s.apply_fetch("http://example.test/a", Ok(counts(&[("分析", 2)])))
            })
            .await
            .unwrap();
        let state = store.read(&view.id, |s| Ok(s.state())).await.unwrap();
        assert_eq!(state, SessionState::Ready);

        assert!(matches!(
            store.read("missing", |s| Ok(s.state())).await,
            Err(WebError::SessionNotFound(_))
        ));
    }
}
