use std::sync::Arc;
use tracing::info;
use wordlens_core::TokenFrequencyMap;

use crate::error::{AnalysisError, AnalysisResult};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::nlp::WordCounter;

/// Runs the fetch and count stages for one URL.
///
/// Counting only happens after a successful fetch; a fetch error is returned
/// untouched and nothing downstream runs.
#[derive(Clone)]
pub struct Analyzer {
    fetcher: Arc<dyn PageFetcher>,
    counter: WordCounter,
}

impl Analyzer {
    /// HTTP fetcher plus jieba counter.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(HttpFetcher::new()), WordCounter::new())
    }

    pub fn with_parts(fetcher: Arc<dyn PageFetcher>, counter: WordCounter) -> Self {
        Self { fetcher, counter }
    }

    /// Fetch `url` and count its tokens.
    ///
    /// Segmentation is CPU bound and runs on the blocking pool.
    pub async fn fetch_and_count(&self, url: &str) -> AnalysisResult<TokenFrequencyMap> {
        let text = self.fetcher.fetch(url).await?;
        let chars = text.chars().count();

        let counter = self.counter.clone();
        let counts = tokio::task::spawn_blocking(move || counter.count(&text))
            .await
            .map_err(|e| AnalysisError::Segmentation(e.to_string()))?;

        info!(url, chars, distinct = counts.len(), "page analysed");
        Ok(counts)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer").finish_non_exhaustive()
    }
}
