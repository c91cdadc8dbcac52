use std::sync::Arc;

use futures::future;
use rand::seq::SliceRandom;
use tokio::sync::Semaphore;

use crate::crawlers::basics::extract_doc_basics;
use crate::crawlers::sitemap::resolve_sitemap_tree;
use crate::crawlers::{CrawlerResult, PageFetcher, fetch_html};
use crate::domain::related::{RelatedLink, RelatedResult};
use crate::models::config::{SamplingStrategy, ServerConfig};
use crate::processing::similarity::{TokenSet, tokenize};

/// Picks at most `size` pages to score.
pub fn sample_urls(mut urls: Vec<String>, size: usize, strategy: SamplingStrategy) -> Vec<String> {
    if strategy == SamplingStrategy::Random && urls.len() > size {
        urls.shuffle(&mut rand::rng());
    }
    urls.truncate(size);
    urls
}

/// Orders results by descending score and keeps the best `max_items`.
///
/// The sort is stable, so equal scores keep their input order.
pub fn rank(mut results: Vec<RelatedResult>, max_items: usize) -> Vec<RelatedLink> {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results
        .into_iter()
        .take(max_items)
        .map(RelatedLink::from)
        .collect()
}

/// Finds pages of a sitemap that share vocabulary with a topic.
///
/// Candidate pages are fetched concurrently, with the number of requests in
/// flight capped by a [`Semaphore`].
pub struct RelatedFinder {
    fetcher: Arc<dyn PageFetcher>,
    semaphore: Arc<Semaphore>,
    sample_size: usize,
    sampling: SamplingStrategy,
}

impl RelatedFinder {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &ServerConfig) -> Self {
        Self::with_limits(
            fetcher,
            config.related_concurrency,
            config.related_sample_size,
            config.related_sampling,
        )
    }

    /// `concurrency` is raised to 1 when zero.
    pub fn with_limits(
        fetcher: Arc<dyn PageFetcher>,
        concurrency: usize,
        sample_size: usize,
        sampling: SamplingStrategy,
    ) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            sample_size,
            sampling,
        }
    }

    /// Fetches and scores a single page. Pages that fail to load or share no
    /// tokens with the topic yield `None`.
    async fn score_page(&self, url: &str, topic: &TokenSet) -> Option<RelatedResult> {
        let _permit = self.semaphore.acquire().await.ok()?;
        let html = fetch_html(self.fetcher.as_ref(), url).await;
        if html.is_empty() {
            return None;
        }

        let basics = extract_doc_basics(&html);
        let score = topic.jaccard(&tokenize(&basics.text));
        log::debug!("Scored {url}: {score:.4}");
        if score <= 0.0 {
            return None;
        }

        let title = if basics.title.is_empty() {
            url.to_string()
        } else {
            basics.title
        };
        Some(RelatedResult {
            url: url.to_string(),
            title,
            score,
        })
    }

    /// Scores every page, returning the positive results in input order.
    pub async fn score_pages(&self, urls: &[String], topic: &TokenSet) -> Vec<RelatedResult> {
        let tasks = urls.iter().map(|url| self.score_page(url, topic));
        future::join_all(tasks).await.into_iter().flatten().collect()
    }

    /// Returns up to `max_items` pages of `sitemap_url` most similar to `topic`.
    pub async fn find(
        &self,
        sitemap_url: &str,
        topic: &str,
        max_items: usize,
    ) -> CrawlerResult<Vec<RelatedLink>> {
        log::info!("Finding pages related to {topic:?} in {sitemap_url}");

        let urls = resolve_sitemap_tree(self.fetcher.as_ref(), sitemap_url).await?;
        let topic_tokens = tokenize(topic);
        if topic_tokens.is_empty() {
            log::warn!("Topic {topic:?} has no scoring tokens");
            return Ok(vec![]);
        }

        let sample = sample_urls(urls, self.sample_size, self.sampling);
        let results = self.score_pages(&sample, &topic_tokens).await;
        log::info!(
            "Scored {} pages, {} related to {topic:?}",
            sample.len(),
            results.len()
        );

        Ok(rank(results, max_items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str, score: f64) -> RelatedResult {
        RelatedResult {
            url: url.to_string(),
            title: url.to_uppercase(),
            score,
        }
    }

    #[test]
    fn rank_sorts_descending_and_truncates() {
        let ranked = rank(
            vec![result("a", 0.1), result("b", 0.5), result("c", 0.3)],
            2,
        );
        let urls: Vec<_> = ranked.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["b", "c"]);
        assert_eq!(ranked[0].title, "B");
    }

    #[test]
    fn rank_keeps_input_order_for_ties() {
        let ranked = rank(
            vec![result("a", 0.2), result("b", 0.4), result("c", 0.2), result("d", 0.2)],
            10,
        );
        let urls: Vec<_> = ranked.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn prefix_sampling_takes_leading_urls() {
        let urls: Vec<String> = (0..5).map(|i| format!("https://a.com/{i}")).collect();
        let sample = sample_urls(urls.clone(), 3, SamplingStrategy::Prefix);
        assert_eq!(sample, urls[..3].to_vec());
    }

    #[test]
    fn random_sampling_returns_distinct_members() {
        let urls: Vec<String> = (0..50).map(|i| format!("https://a.com/{i}")).collect();
        let sample = sample_urls(urls.clone(), 10, SamplingStrategy::Random);
        assert_eq!(sample.len(), 10);
        assert!(sample.iter().all(|u| urls.contains(u)));

        let mut unique = sample.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 10);

        assert_eq!(sample_urls(urls[..3].to_vec(), 10, SamplingStrategy::Random).len(), 3);
    }
}
