use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pagecard_core::error::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Fetch failures never get here: they travel inside the scrape envelope.
        let (status, error_type) = match &self.0 {
            AppError::InvalidUrl(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.0.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[tokio::test]
    async fn invalid_url_maps_to_422() {
        let response = ApiError(AppError::InvalidUrl("'/testpage': relative URL".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["message"], "Invalid URL: '/testpage': relative URL");
    }

    #[test]
    fn anything_else_is_internal() {
        let response = ApiError(AppError::Generic("boom".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
