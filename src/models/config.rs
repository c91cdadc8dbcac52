//! Configuration model loaded from external sources.

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

use crate::crawlers::CrawlerResult;
use crate::domain::allow_list::AllowList;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_VAR: &str = "SCOUT_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config/default";

/// How the related-content finder picks pages from a large sitemap.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SamplingStrategy {
    /// The first pages in sitemap order.
    #[default]
    Prefix,
    /// A uniform random sample.
    Random,
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared by both pipelines and the HTTP server.
pub struct ServerConfig {
    pub bind_address: String,
    pub user_agent: String,
    pub allowed_competitors: Vec<String>,
    pub default_sitemap_url: Option<String>,
    pub crawl_max_posts: usize,
    pub related_sample_size: usize,
    pub related_concurrency: usize,
    pub related_sampling: SamplingStrategy,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Loads `config/default.*` (or the file named by `SCOUT_CONFIG`) and
    /// applies `SCOUT_*` environment overrides.
    pub fn load() -> CrawlerResult<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let builder = defaults()?.add_source(File::with_name(&path).required(false));
        Self::finish(builder)
    }

    /// Loads a specific configuration file, still honouring environment overrides.
    pub fn from_file(path: &Path) -> CrawlerResult<Self> {
        let builder = defaults()?.add_source(File::from(path));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> CrawlerResult<Self> {
        let settings = builder
            .add_source(
                Environment::with_prefix("SCOUT")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_competitors"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn allow_list(&self) -> AllowList {
        AllowList::new(&self.allowed_competitors)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn defaults() -> CrawlerResult<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("bind_address", "0.0.0.0:8080")?
        .set_default("user_agent", "EdifyContentBot/1.0")?
        .set_default("allowed_competitors", Vec::<String>::new())?
        .set_default("crawl_max_posts", 5)?
        .set_default("related_sample_size", 200)?
        .set_default("related_concurrency", 16)?
        .set_default("related_sampling", "prefix")?
        .set_default("request_timeout_secs", 20)?)
}
