use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Selector};
use thiserror::Error;

pub mod article;
pub mod basics;
pub mod sitemap;

/// Errors produced while discovering and fetching competitor content.
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Fetch(String),
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error("Failed to build crawler: {0}")]
    Build(String),
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

pub type CrawlerResult<T> = Result<T, CrawlerError>;

/// A source of raw page bodies.
///
/// Implementations return [`CrawlerError::Status`] for non-success responses
/// and [`CrawlerError::Fetch`] when the request could not be completed.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs a single GET request and returns the response body.
    async fn get(&self, url: &str) -> CrawlerResult<String>;
}

/// Builds the shared HTTP client with the identifying User-Agent.
pub fn build_reqwest_client(user_agent: &str, timeout: Duration) -> CrawlerResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| CrawlerError::Build(e.to_string()))
}

/// [`PageFetcher`] backed by `reqwest`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> CrawlerResult<Self> {
        Ok(Self {
            client: build_reqwest_client(user_agent, timeout)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> CrawlerResult<String> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CrawlerError::Fetch(format!("Failed to get URL {url}: {e}")))?;
        if !res.status().is_success() {
            return Err(CrawlerError::Status {
                url: url.to_string(),
                status: res.status().as_u16(),
            });
        }
        res.text()
            .await
            .map_err(|e| CrawlerError::Fetch(format!("Failed to read body of {url}: {e}")))
    }
}

/// Trimmed text of the first descendant of `root` matching `css`.
pub(crate) fn first_text(root: ElementRef<'_>, css: &str) -> String {
    let selector = Selector::parse(css).unwrap();
    root.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Fetches a page, returning empty text instead of failing.
pub async fn fetch_html(fetcher: &dyn PageFetcher, url: &str) -> String {
    match fetcher.get(url).await {
        Ok(body) => body,
        Err(e) => {
            log::warn!("{e}");
            String::new()
        }
    }
}
