use std::sync::Arc;

use pushkind_scout::api::{AppState, router};
use pushkind_scout::crawlers::HttpFetcher;
use pushkind_scout::models::config::ServerConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let fetcher = match HttpFetcher::new(&config.user_agent, config.request_timeout()) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            log::error!("Failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let app = router(AppState::new(&config, fetcher));

    let listener = match tokio::net::TcpListener::bind(&config.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Cannot bind to {}: {e}", config.bind_address);
            std::process::exit(1);
        }
    };
    log::info!("Listening on {}", config.bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server error: {e}");
        std::process::exit(1);
    }
}
