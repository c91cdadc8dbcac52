//! Sitemap and feed discovery.

use std::collections::HashSet;

use quick_xml::Reader;
use quick_xml::events::Event;
use url::Url;

use crate::crawlers::{CrawlerError, CrawlerResult, PageFetcher};

/// Well-known sitemap/feed locations, probed in this order.
pub const FEED_PATHS: [&str; 4] = ["sitemap.xml", "blog/sitemap.xml", "feed", "rss.xml"];

/// Nested sitemaps fetched per resolution. Index entries past this are ignored.
pub const MAX_NESTED_SITEMAPS: usize = 10;

/// The first sitemap or feed that answered for a domain.
#[derive(Debug, Clone)]
pub struct FeedSource {
    pub url: String,
    pub body: String,
}

/// A `<loc>` entry of a sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapEntry {
    /// Points at another sitemap (`.xml` suffix).
    Index(String),
    /// Points at a content page.
    Leaf(String),
}

impl SitemapEntry {
    pub fn classify(url: String) -> Self {
        if url.ends_with(".xml") {
            SitemapEntry::Index(url)
        } else {
            SitemapEntry::Leaf(url)
        }
    }
}

/// Sitemap entries split by kind, each in document order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SitemapPartition {
    pub indexes: Vec<String>,
    pub leaves: Vec<String>,
}

pub fn partition_entries(locations: Vec<String>) -> SitemapPartition {
    let mut partition = SitemapPartition::default();
    for location in locations {
        match SitemapEntry::classify(location) {
            SitemapEntry::Index(url) => partition.indexes.push(url),
            SitemapEntry::Leaf(url) => partition.leaves.push(url),
        }
    }
    partition
}

/// Drops the fragment of an absolute URL. Unparsable input is returned as is.
pub fn normalize_url(input: &str) -> String {
    match Url::parse(input) {
        Ok(mut url) if url.fragment().is_some() => {
            url.set_fragment(None);
            url.to_string()
        }
        _ => input.to_string(),
    }
}

/// Returns the text content of every element with the given local name.
fn element_texts(xml: &str, tag: &[u8]) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;

    let mut texts = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == tag => {
                current = Some(String::new());
            }
            Ok(Event::Text(e)) => {
                if let Some(buf) = current.as_mut() {
                    match e.unescape() {
                        Ok(text) => buf.push_str(&text),
                        Err(_) => buf.push_str(&String::from_utf8_lossy(&e)),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == tag => {
                if let Some(text) = current.take() {
                    let text = text.trim();
                    if !text.is_empty() {
                        texts.push(text.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::debug!(
                    "Stopped reading XML at position {}: {e}",
                    reader.buffer_position()
                );
                break;
            }
            _ => {}
        }
    }

    texts
}

/// Returns the entry links of an Atom feed.
///
/// Only documents whose root element is `feed` are read. Within each `entry`,
/// `<link>` elements with no `rel` or `rel="alternate"` contribute their
/// `href`; feed-level links such as `rel="self"` are ignored.
fn atom_entry_links(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = false;

    let mut hrefs = Vec::new();
    let mut seen_root = false;
    let mut in_entry = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if !seen_root => {
                if e.local_name().as_ref() != b"feed" {
                    return vec![];
                }
                seen_root = true;
            }
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"entry" => in_entry = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"entry" => in_entry = false,
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if in_entry && e.local_name().as_ref() == b"link" =>
            {
                let mut href = None;
                let mut alternate = true;
                for attr in e.attributes().flatten() {
                    let value = match attr.unescape_value() {
                        Ok(value) => value.trim().to_string(),
                        Err(_) => String::from_utf8_lossy(&attr.value).trim().to_string(),
                    };
                    match attr.key.as_ref() {
                        b"href" => href = Some(value),
                        b"rel" => alternate = value == "alternate",
                        _ => {}
                    }
                }
                if let Some(href) = href.filter(|h| alternate && !h.is_empty()) {
                    hrefs.push(href);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    hrefs
}

/// Every `<loc>` value in document order.
pub fn parse_locations(xml: &str) -> Vec<String> {
    element_texts(xml, b"loc")
}

/// Extracts candidate article links from a sitemap or feed.
///
/// `<loc>` values are preferred. When a document has none, `<link>` texts
/// (RSS) are used, then the entry links of an Atom feed. Only absolute
/// `http(s)` URLs containing `domain` are kept, in document order and without
/// deduplication.
pub fn extract_locations(xml: &str, domain: &str) -> Vec<String> {
    let mut items = parse_locations(xml);
    if items.is_empty() {
        items = element_texts(xml, b"link");
    }
    if items.is_empty() {
        items = atom_entry_links(xml);
    }

    items
        .into_iter()
        .filter(|u| (u.starts_with("http://") || u.starts_with("https://")) && u.contains(domain))
        .collect()
}

/// Probes the well-known sitemap/feed paths of `domain` and returns the first
/// one that answers with a success status.
pub async fn resolve_domain_feed(
    fetcher: &dyn PageFetcher,
    domain: &str,
) -> CrawlerResult<FeedSource> {
    for path in FEED_PATHS {
        let url = format!("https://{domain}/{path}");
        match fetcher.get(&url).await {
            Ok(body) => {
                log::info!("Using feed {url}");
                return Ok(FeedSource { url, body });
            }
            Err(e) => log::debug!("Feed candidate unavailable: {e}"),
        }
    }
    Err(CrawlerError::NotFound("No sitemap or feed found".to_string()))
}

/// Resolves every content page listed by a sitemap.
///
/// Leaf entries of the root sitemap are combined with the leaf entries of up
/// to [`MAX_NESTED_SITEMAPS`] nested sitemaps. Nested sitemaps are followed one
/// level deep only, and a nested sitemap that cannot be fetched is skipped.
/// The result keeps first-seen order and holds no duplicates.
pub async fn resolve_sitemap_tree(
    fetcher: &dyn PageFetcher,
    sitemap_url: &str,
) -> CrawlerResult<Vec<String>> {
    let xml = fetcher.get(sitemap_url).await.map_err(|e| {
        log::error!("Failed to fetch sitemap: {e}");
        CrawlerError::Fetch(format!("Unable to fetch sitemap {sitemap_url}"))
    })?;

    let SitemapPartition { indexes, leaves } = partition_entries(parse_locations(&xml));
    if indexes.len() > MAX_NESTED_SITEMAPS {
        log::warn!(
            "Sitemap {sitemap_url} lists {} nested sitemaps, only the first {MAX_NESTED_SITEMAPS} are read",
            indexes.len()
        );
    }

    let mut page_urls = leaves;
    for index_url in indexes.iter().take(MAX_NESTED_SITEMAPS) {
        let nested = match fetcher.get(index_url).await {
            Ok(nested) => nested,
            Err(e) => {
                log::warn!("Skipping nested sitemap: {e}");
                continue;
            }
        };
        page_urls.extend(partition_entries(parse_locations(&nested)).leaves);
    }

    let mut seen = HashSet::new();
    let mut unique: Vec<String> = page_urls.iter().map(|u| normalize_url(u)).collect();
    unique.retain(|u| seen.insert(u.clone()));

    log::info!("Resolved {} pages from {sitemap_url}", unique.len());
    Ok(unique)
}
