use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pagecard_core::{AppError, Fetcher};

use crate::dto::{HealthResponse, RootResponse, ScrapeRequest, ScrapeResponse};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Request bodies only ever carry a URL.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Build the full router with all routes.
pub fn router<F: Fetcher + 'static>(state: Arc<AppState<F>>) -> Router {
    let api = Router::new()
        .route("/api/scrape", post(scrape::<F>))
        .route("/api/health", get(health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    Router::new()
        .route("/", get(root))
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/scrape",
    request_body = ScrapeRequest,
    responses(
        (status = 200, description = "Scrape envelope, successful or not", body = ScrapeResponse),
        (status = 422, description = "URL is not an absolute http(s) URL", body = crate::dto::ErrorResponse),
    ),
    tag = "scrape"
)]
pub async fn scrape<F: Fetcher + 'static>(
    State(state): State<Arc<AppState<F>>>,
    axum::Json(body): axum::Json<ScrapeRequest>,
) -> Result<axum::Json<ScrapeResponse>, ApiError> {
    let url = validate_request_url(&body.url)?;
    tracing::info!(url = %url, "Scrape requested");

    let envelope = state.scraper.scrape_envelope(url.as_str()).await;
    Ok(axum::Json(ScrapeResponse::from(envelope)))
}

/// Accept only absolute `http`/`https` URLs with a host.
fn validate_request_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim()).map_err(|e| AppError::InvalidUrl(format!("'{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::InvalidUrl(format!(
            "'{raw}': scheme '{}' is not allowed (only http/https)",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::InvalidUrl(format!("'{raw}': URL has no host")));
    }
    Ok(url)
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse { status: "healthy" })
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service metadata", body = RootResponse),
    ),
    tag = "system"
)]
pub async fn root() -> axum::Json<RootResponse> {
    axum::Json(RootResponse {
        name: "pagecard",
        version: env!("CARGO_PKG_VERSION"),
        description: "Extracts contact details from public social-network pages",
    })
}
