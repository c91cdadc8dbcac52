use chrono::{DateTime, Utc};
use serde::Serialize;

/// Cleaned text of a single competitor post.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    pub text: String,
}

/// Outcome of crawling one competitor domain.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    /// Sitemap or feed the links were taken from.
    pub source_url: String,
    pub count: usize,
    pub articles: Vec<Article>,
    pub crawled_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn new(source_url: String, articles: Vec<Article>) -> Self {
        Self {
            source_url,
            count: articles.len(),
            articles,
            crawled_at: Utc::now(),
        }
    }
}
