use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pagecard_client::{FetchConfig, ReqwestFetcher};
use pagecard_core::ScrapeService;
use pagecard_server::config::ServerConfig;
use pagecard_server::routes;
use pagecard_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pagecard=info".parse()?))
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;
    let mut fetcher = ReqwestFetcher::new(FetchConfig::from_env()?)?;
    if config.allow_private_urls {
        tracing::warn!("SSRF protection disabled: private and reserved IPs are reachable");
        fetcher = fetcher.allow_private_urls();
    }

    let state = Arc::new(AppState::new(ScrapeService::new(fetcher)));

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.addr();
    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
