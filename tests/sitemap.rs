mod common;

use common::{StubFetcher, urlset};
use pushkind_scout::crawlers::CrawlerError;
use pushkind_scout::crawlers::sitemap::{
    MAX_NESTED_SITEMAPS, resolve_domain_feed, resolve_sitemap_tree,
};

#[tokio::test]
async fn feed_probes_paths_in_order() {
    let fetcher = StubFetcher::new().with_page("https://example.com/rss.xml", "<rss/>");

    let feed = resolve_domain_feed(&fetcher, "example.com")
        .await
        .expect("rss feed should be found");

    assert_eq!(feed.url, "https://example.com/rss.xml");
    assert_eq!(feed.body, "<rss/>");
    assert_eq!(
        fetcher.requests(),
        vec![
            "https://example.com/sitemap.xml",
            "https://example.com/blog/sitemap.xml",
            "https://example.com/feed",
            "https://example.com/rss.xml",
        ]
    );
}

#[tokio::test]
async fn feed_stops_at_first_success() {
    let fetcher = StubFetcher::new()
        .with_page("https://example.com/sitemap.xml", "<urlset/>")
        .with_page("https://example.com/feed", "<rss/>");

    let feed = resolve_domain_feed(&fetcher, "example.com")
        .await
        .expect("sitemap should be found");

    assert_eq!(feed.url, "https://example.com/sitemap.xml");
    assert_eq!(fetcher.requests().len(), 1);
}

#[tokio::test]
async fn feed_not_found_when_every_probe_fails() {
    let fetcher = StubFetcher::new();

    let err = resolve_domain_feed(&fetcher, "example.com")
        .await
        .expect_err("no feed exists");

    assert!(matches!(err, CrawlerError::NotFound(_)));
    assert_eq!(err.to_string(), "No sitemap or feed found");
    assert_eq!(fetcher.requests().len(), 4);
}

#[tokio::test]
async fn tree_unions_nested_leaves_without_duplicates() {
    let fetcher = StubFetcher::new()
        .with_page(
            "https://a.com/sitemap.xml",
            urlset(&[
                "https://a.com/posts.xml",
                "https://a.com/p1",
                "https://a.com/missing.xml",
                "https://a.com/p2",
            ]),
        )
        .with_page(
            "https://a.com/posts.xml",
            urlset(&[
                "https://a.com/p2",
                "https://a.com/deeper.xml",
                "https://a.com/p3",
                "https://a.com/p1#comments",
            ]),
        )
        .with_page("https://a.com/deeper.xml", urlset(&["https://a.com/p4"]));

    let urls = resolve_sitemap_tree(&fetcher, "https://a.com/sitemap.xml")
        .await
        .expect("sitemap should resolve");

    assert_eq!(
        urls,
        vec!["https://a.com/p1", "https://a.com/p2", "https://a.com/p3"]
    );
    assert!(
        !fetcher
            .requests()
            .contains(&"https://a.com/deeper.xml".to_string())
    );
}

#[tokio::test]
async fn tree_reads_at_most_ten_nested_sitemaps() {
    let indexes: Vec<String> = (0..12).map(|i| format!("https://a.com/s{i}.xml")).collect();
    let index_refs: Vec<&str> = indexes.iter().map(String::as_str).collect();

    let mut fetcher = StubFetcher::new().with_page("https://a.com/sitemap.xml", urlset(&index_refs));
    for (i, index) in indexes.iter().enumerate() {
        fetcher = fetcher.with_page(index, urlset(&[format!("https://a.com/page{i}").as_str()]));
    }

    let urls = resolve_sitemap_tree(&fetcher, "https://a.com/sitemap.xml")
        .await
        .expect("sitemap should resolve");

    assert_eq!(urls.len(), MAX_NESTED_SITEMAPS);
    assert_eq!(urls.last().map(String::as_str), Some("https://a.com/page9"));
    assert_eq!(fetcher.requests().len(), 1 + MAX_NESTED_SITEMAPS);
}

#[tokio::test]
async fn tree_fails_when_root_sitemap_is_unreachable() {
    let fetcher = StubFetcher::new();

    let err = resolve_sitemap_tree(&fetcher, "https://a.com/sitemap.xml")
        .await
        .expect_err("root sitemap is missing");

    assert!(matches!(err, CrawlerError::Fetch(_)));
}
