//! HTTP surface: `POST /api/crawl` and `POST /api/related`.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::crawlers::{CrawlerError, PageFetcher};
use crate::domain::article::CrawlReport;
use crate::domain::related::RelatedLink;
use crate::models::config::ServerConfig;
use crate::processing::crawl::CrawlPipeline;
use crate::processing::related::RelatedFinder;

/// Related pages returned when the request does not say otherwise.
pub const DEFAULT_MAX_ITEMS: usize = 5;

/// Pipelines shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub crawl: Arc<CrawlPipeline>,
    pub related: Arc<RelatedFinder>,
    pub default_sitemap_url: Option<String>,
}

impl AppState {
    pub fn new(config: &ServerConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            crawl: Arc::new(CrawlPipeline::new(Arc::clone(&fetcher), config)),
            related: Arc::new(RelatedFinder::new(fetcher, config)),
            default_sitemap_url: config.default_sitemap_url.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub max_posts: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedRequest {
    #[serde(default)]
    pub sitemap_url: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub max_items: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RelatedResponse {
    pub related: Vec<RelatedLink>,
    pub topic: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for CrawlerError {
    fn into_response(self) -> Response {
        let status = match &self {
            CrawlerError::Validation(_) => StatusCode::BAD_REQUEST,
            CrawlerError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("Request failed: {self}");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

async fn crawl_handler(
    State(state): State<AppState>,
    payload: Result<Json<CrawlRequest>, JsonRejection>,
) -> Result<Json<CrawlReport>, CrawlerError> {
    let Json(request) = payload.map_err(|e| CrawlerError::Validation(e.body_text()))?;
    let domain = request.domain.unwrap_or_default();
    let report = state.crawl.crawl(&domain, request.max_posts).await?;
    Ok(Json(report))
}

async fn related_handler(
    State(state): State<AppState>,
    payload: Result<Json<RelatedRequest>, JsonRejection>,
) -> Result<Json<RelatedResponse>, CrawlerError> {
    let Json(request) = payload.map_err(|e| CrawlerError::Validation(e.body_text()))?;

    let topic = request.topic.unwrap_or_default();
    let sitemap_url = request
        .sitemap_url
        .or_else(|| state.default_sitemap_url.clone())
        .unwrap_or_default();
    if sitemap_url.is_empty() || topic.is_empty() {
        return Err(CrawlerError::Validation(
            "Missing sitemapUrl or topic".to_string(),
        ));
    }

    let max_items = request.max_items.unwrap_or(DEFAULT_MAX_ITEMS);
    let related = state.related.find(&sitemap_url, &topic, max_items).await?;
    Ok(Json(RelatedResponse { related, topic }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/crawl", post(crawl_handler))
        .route("/api/related", post(related_handler))
        .with_state(state)
}
