use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pagecard_core::{PageRecord, ScrapeEnvelope};

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ScrapeRequest {
    /// Absolute http(s) URL of the page to scrape
    #[schema(example = "https://www.facebook.com/testpage")]
    pub url: String,
}

/// Contact details found on the page. Fields that could not be found are null.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PageRecordResponse {
    pub page_url: String,
    pub page_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl From<PageRecord> for PageRecordResponse {
    fn from(record: PageRecord) -> Self {
        Self {
            page_url: record.page_url,
            page_name: record.page_name,
            email: record.email,
            phone: record.phone,
            website: record.website,
            address: record.address,
            scraped_at: record.scraped_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ScrapeResponse {
    pub success: bool,
    pub data: Option<PageRecordResponse>,
    pub error: Option<String>,
}

impl From<ScrapeEnvelope> for ScrapeResponse {
    fn from(envelope: ScrapeEnvelope) -> Self {
        Self {
            success: envelope.success,
            data: envelope.data.map(PageRecordResponse::from),
            error: envelope.error,
        }
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RootResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
