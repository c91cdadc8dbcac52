pub mod api;
pub mod crawlers;
pub mod domain;
pub mod models;
pub mod processing;

/// Maximum number of characters kept from an article body.
pub const ARTICLE_TEXT_LIMIT: usize = 15_000;
