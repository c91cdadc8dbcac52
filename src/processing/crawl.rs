use std::sync::Arc;

use crate::crawlers::article::clean_article;
use crate::crawlers::sitemap::{extract_locations, resolve_domain_feed};
use crate::crawlers::{CrawlerError, CrawlerResult, PageFetcher, fetch_html};
use crate::domain::allow_list::AllowList;
use crate::domain::article::{Article, CrawlReport};
use crate::models::config::ServerConfig;

/// Reduces user input such as `https://Blog.Example.com/posts` to a bare
/// lowercase host (`blog.example.com`).
pub fn normalize_domain(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    without_scheme
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Discovers the latest posts of an allow-listed competitor and extracts
/// their article text.
pub struct CrawlPipeline {
    fetcher: Arc<dyn PageFetcher>,
    allow_list: AllowList,
    default_max_posts: usize,
}

impl CrawlPipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &ServerConfig) -> Self {
        Self::with_allow_list(fetcher, config.allow_list(), config.crawl_max_posts)
    }

    pub fn with_allow_list(
        fetcher: Arc<dyn PageFetcher>,
        allow_list: AllowList,
        default_max_posts: usize,
    ) -> Self {
        Self {
            fetcher,
            allow_list,
            default_max_posts,
        }
    }

    /// Crawls `domain`, fetching at most `max_posts` articles one at a time.
    ///
    /// Articles keep the order of the links in the sitemap or feed. A link
    /// that cannot be fetched is skipped; only a missing sitemap/feed fails
    /// the whole crawl.
    pub async fn crawl(&self, domain: &str, max_posts: Option<usize>) -> CrawlerResult<CrawlReport> {
        let domain = normalize_domain(domain);
        if domain.is_empty() {
            return Err(CrawlerError::Validation("Missing domain".to_string()));
        }
        if !self.allow_list.is_allowed(&domain) {
            log::warn!("Rejected crawl of {domain}: not on the allow-list");
            return Err(CrawlerError::Forbidden("Domain not allowed".to_string()));
        }

        let max_posts = max_posts.unwrap_or(self.default_max_posts);
        log::info!("Crawling {domain} for up to {max_posts} posts");

        let feed = resolve_domain_feed(self.fetcher.as_ref(), &domain).await?;
        let links = extract_locations(&feed.body, &domain);

        let mut articles: Vec<Article> = Vec::new();
        for url in links.iter().take(max_posts) {
            let html = fetch_html(self.fetcher.as_ref(), url).await;
            if html.is_empty() {
                log::warn!("Skipping {url}: no content");
                continue;
            }
            articles.push(clean_article(&html).into_article(url));
        }

        log::info!(
            "Finished crawling {domain}: {} of {} links extracted",
            articles.len(),
            links.len().min(max_posts)
        );
        Ok(CrawlReport::new(feed.url, articles))
    }
}
