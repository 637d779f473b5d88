use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use pagecard_core::AppError;

use crate::integration::common::{StubFetcher, TEST_PAGE, setup_test_app};

fn scrape_request(body: &str) -> Request<Body> {
    Request::post("/api/scrape")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app(StubFetcher::html(TEST_PAGE));

    let response = app
        .router
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json, serde_json::json!({"status": "healthy"}));
}

#[tokio::test]
async fn root_describes_service() {
    let app = setup_test_app(StubFetcher::html(TEST_PAGE));

    let response = app
        .router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["name"], "pagecard");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["description"].is_string());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app(StubFetcher::html(TEST_PAGE));

    let response = app
        .router
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["paths"]["/api/scrape"]["post"].is_object());
    assert!(json["paths"]["/api/health"]["get"].is_object());
}

#[tokio::test]
async fn scrape_returns_envelope_with_record() {
    let app = setup_test_app(StubFetcher::html(TEST_PAGE));

    let response = app
        .router
        .oneshot(scrape_request(
            r#"{"url": "https://www.facebook.com/testpage"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert!(json["error"].is_null());

    let data = &json["data"];
    assert_eq!(data["page_url"], "https://www.facebook.com/testpage/about");
    assert_eq!(data["page_name"], "Test Page");
    assert_eq!(data["email"], "test@example.com");
    assert_eq!(data["phone"], "+1234567890");
    assert_eq!(data["website"], "https://www.example.com");
    assert_eq!(data["address"], "Address: 12 Harbour Road, Portsmouth");
    assert!(data["scraped_at"].is_string());

    assert_eq!(
        *app.fetcher.requested.lock().unwrap(),
        vec!["https://www.facebook.com/testpage/about".to_string()]
    );
}

#[tokio::test]
async fn scrape_with_no_signal_leaves_fields_null() {
    let app = setup_test_app(StubFetcher::html("<html><body><p>nothing</p></body></html>"));

    let response = app
        .router
        .oneshot(scrape_request(
            r#"{"url": "https://www.facebook.com/quietpage/about"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["page_url"], "https://www.facebook.com/quietpage/about");
    for field in ["page_name", "email", "phone", "website", "address"] {
        assert!(json["data"][field].is_null(), "{field} should be null");
    }
}

#[tokio::test]
async fn scrape_fetch_failure_is_reported_in_envelope() {
    let app = setup_test_app(StubFetcher::failing(AppError::NetworkError(
        "Connection failed: connection refused".into(),
    )));

    let response = app
        .router
        .oneshot(scrape_request(
            r#"{"url": "https://www.facebook.com/testpage"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
    assert_eq!(
        json["error"],
        "Failed to fetch the page: Network error: Connection failed: connection refused"
    );
}

#[tokio::test]
async fn scrape_relative_url_returns_422() {
    let app = setup_test_app(StubFetcher::html(TEST_PAGE));

    let response = app
        .router
        .oneshot(scrape_request(r#"{"url": "/testpage"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert_eq!(json["error"], "validation_error");
    assert!(app.fetcher.requested.lock().unwrap().is_empty());
}

#[tokio::test]
async fn scrape_non_http_scheme_returns_422() {
    let app = setup_test_app(StubFetcher::html(TEST_PAGE));

    let response = app
        .router
        .oneshot(scrape_request(r#"{"url": "file:///etc/passwd"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.fetcher.requested.lock().unwrap().is_empty());
}

#[tokio::test]
async fn scrape_missing_url_field_is_rejected() {
    let app = setup_test_app(StubFetcher::html(TEST_PAGE));

    let response = app
        .router
        .oneshot(scrape_request(r#"{"link": "https://www.facebook.com/testpage"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn scrape_oversized_body_is_rejected() {
    let app = setup_test_app(StubFetcher::html(TEST_PAGE));
    let body = format!(r#"{{"url": "https://www.facebook.com/{}"}}"#, "a".repeat(20_000));

    let response = app.router.oneshot(scrape_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
