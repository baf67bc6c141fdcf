use async_trait::async_trait;
use reqwest::header::USER_AGENT as USER_AGENT_HEADER;
use reqwest::Url;
use tracing::{info, warn};
use wordlens_core::constants::USER_AGENT;

use crate::error::FetchError;
use crate::extract::visible_text;

/// Source of page text for the analysis pipeline.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its visible text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages over HTTP(S) with a fixed browser user agent.
///
/// Each call opens and drops its own client; there is no retry, no timeout
/// override, and no caching.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl HttpFetcher {
    pub fn new() -> Self {
        Self
    }

    /// Fetch the body of `url`, decoded as a string.
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let parsed = parse_url(url)?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        info!(url = %parsed, "fetching page");
        let response = client
            .get(parsed)
            .header(USER_AGENT_HEADER, USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                warn!(url, error = %e, "page request failed");
                FetchError::Network {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "page answered with error status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Decodes with the Content-Type charset, UTF-8 when none is given.
        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        info!(url, bytes = body.len(), "page fetched");

        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let html = self.fetch_html(url).await?;
        Ok(visible_text(&html))
    }
}

fn parse_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme `{}`", other),
        }),
    }
}
