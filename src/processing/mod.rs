pub mod crawl;
pub mod related;
pub mod similarity;
