use std::net::SocketAddr;

use axum::{
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use wordlens_analysis::fetch::{HttpFetcher, PageFetcher};
use wordlens_analysis::pipeline::Analyzer;
use wordlens_analysis::rank::rank;
use wordlens_analysis::{AnalysisError, FetchError};
use wordlens_core::constants::USER_AGENT;

const ARTICLE: &str = r#"<!DOCTYPE html>
<html><head><title>文本分析</title><style>.x { color: red }</style></head>
<body>
  <article>
    <h1>文本分析</h1>
    <p>文本分析是数据分析的一部分。</p>
    <p>文本分析需要分词。</p>
    <script>var 隐藏 = "不应计数";</script>
  </article>
</body></html>"#;

/// `<p>中文分析</p>` encoded as GBK.
const GBK_ARTICLE: &[u8] = b"<html><body><p>\xd6\xd0\xce\xc4\xb7\xd6\xce\xf6</p></body></html>";

async fn spawn_fixture_server() -> Result<SocketAddr, Box<dyn std::error::Error>> {
    let app = Router::new()
        .route(
            "/article",
            get(|| async { ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], ARTICLE) }),
        )
        .route(
            "/echo-agent",
            get(|headers: HeaderMap| async move {
                let agent = headers
                    .get(header::USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                format!("<html><body><p>{}</p></body></html>", agent)
            }),
        )
        .route(
            "/gbk",
            get(|| async { ([(header::CONTENT_TYPE, "text/html; charset=gbk")], GBK_ARTICLE) }),
        )
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "<p>not here</p>") }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

/// An address nothing listens on: bind an ephemeral port, then release it.
async fn unreachable_addr() -> Result<SocketAddr, Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

#[tokio::test]
async fn fetch_returns_visible_text() -> Result<(), Box<dyn std::error::Error>> {
    let addr = spawn_fixture_server().await?;
    let text = HttpFetcher::new()
        .fetch(&format!("http://{}/article", addr))
        .await?;

    assert!(text.contains("文本分析是数据分析的一部分。"));
    assert!(text.contains("文本分析需要分词。"));
    assert!(!text.contains("不应计数"));
    assert!(!text.contains("color: red"));
    Ok(())
}

#[tokio::test]
async fn fetch_sends_browser_user_agent() -> Result<(), Box<dyn std::error::Error>> {
    let addr = spawn_fixture_server().await?;
    let text = HttpFetcher::new()
        .fetch(&format!("http://{}/echo-agent", addr))
        .await?;

    assert_eq!(text, USER_AGENT);
    Ok(())
}

#[tokio::test]
async fn fetch_decodes_declared_charset() -> Result<(), Box<dyn std::error::Error>> {
    let addr = spawn_fixture_server().await?;
    let text = HttpFetcher::new()
        .fetch(&format!("http://{}/gbk", addr))
        .await?;

    assert_eq!(text, "中文分析");
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() -> Result<(), Box<dyn std::error::Error>> {
    let addr = spawn_fixture_server().await?;
    let url = format!("http://{}/missing", addr);
    let err = HttpFetcher::new().fetch(&url).await.expect_err("404 must fail");

    assert_eq!(err, FetchError::Status { url, status: 404 });
    assert!(err.to_string().contains("HTTP 404"));
    Ok(())
}

#[tokio::test]
async fn unreachable_host_is_a_fetch_error() -> Result<(), Box<dyn std::error::Error>> {
    let addr = unreachable_addr().await?;
    let err = HttpFetcher::new()
        .fetch(&format!("http://{}/", addr))
        .await
        .expect_err("nothing listens there");

    assert!(matches!(err, FetchError::Network { .. }));
    Ok(())
}

#[tokio::test]
async fn analyzer_counts_fetched_article() -> Result<(), Box<dyn std::error::Error>> {
    let addr = spawn_fixture_server().await?;
    let counts = Analyzer::new()
        .fetch_and_count(&format!("http://{}/article", addr))
        .await?;

    assert!(!counts.is_empty());
    assert!(counts.iter().all(|(token, _)| token.chars().count() > 1));
    assert!(counts.get("分析").unwrap_or(0) + counts.get("文本分析").unwrap_or(0) >= 3);

    let ranked = rank(&counts, 1);
    assert!(!ranked.is_empty());
    assert!(ranked.len() <= 20);
    Ok(())
}

#[tokio::test]
async fn analyzer_surfaces_fetch_failure() -> Result<(), Box<dyn std::error::Error>> {
    let addr = unreachable_addr().await?;
    let result = Analyzer::new()
        .fetch_and_count(&format!("http://{}/", addr))
        .await;

    assert!(matches!(result, Err(AnalysisError::Fetch(FetchError::Network { .. }))));
    Ok(())
}
