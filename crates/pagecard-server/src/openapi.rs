use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "pagecard API",
        version = "0.1.0",
        description = "Extracts contact details from public social-network pages."
    ),
    paths(
        crate::routes::scrape,
        crate::routes::health,
        crate::routes::root,
    ),
    components(schemas(
        crate::dto::ScrapeRequest,
        crate::dto::ScrapeResponse,
        crate::dto::PageRecordResponse,
        crate::dto::HealthResponse,
        crate::dto::RootResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "scrape", description = "Contact extraction"),
        (name = "system", description = "Health and service metadata"),
    )
)]
pub struct ApiDoc;
