use thiserror::Error;

/// Application-wide error types for pagecard.
///
/// Only transport failures ever abort a scrape. Malformed markup, broken
/// JSON payloads and strings that fail validation never become an
/// `AppError`; the extraction engine resolves them into absent fields.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (non-2xx status, unreadable body, ...).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The target URL could not be parsed or is not allowed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid or missing configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error happened while fetching the page.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_)
                | AppError::NetworkError(_)
                | AppError::Timeout(_)
                | AppError::InvalidUrl(_)
        )
    }

    /// Message shown to callers in the response envelope.
    pub fn envelope_message(&self) -> String {
        if self.is_transport() {
            format!("Failed to fetch the page: {self}")
        } else {
            format!("Error during page scraping: {self}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors() {
        assert!(AppError::NetworkError("reset".into()).is_transport());
        assert!(AppError::Timeout(30).is_transport());
        assert!(AppError::HttpError("HTTP 404".into()).is_transport());
        assert!(AppError::InvalidUrl("relative URL".into()).is_transport());
        assert!(!AppError::ConfigError("bad port".into()).is_transport());
        assert!(!AppError::Generic("boom".into()).is_transport());
    }

    #[test]
    fn test_envelope_message_prefixes() {
        let msg = AppError::NetworkError("Connection failed: connection refused".into())
            .envelope_message();
        assert_eq!(
            msg,
            "Failed to fetch the page: Network error: Connection failed: connection refused"
        );

        let msg = AppError::Generic("boom".into()).envelope_message();
        assert_eq!(msg, "Error during page scraping: boom");
    }
}
