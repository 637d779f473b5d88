use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Contact details extracted from one page.
///
/// Built once per scrape by the [`ExtractionPipeline`](crate::pipeline::ExtractionPipeline)
/// and handed back by value. `email`, when set, is lower-case and passes
/// [`is_valid_email`](crate::text::is_valid_email).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// The About-page URL that was requested.
    pub page_url: String,
    pub page_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl PageRecord {
    /// Empty record for `page_url`, stamped with the current time.
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            page_name: None,
            email: None,
            phone: None,
            website: None,
            address: None,
            scraped_at: Utc::now(),
        }
    }
}

/// Raw result of a page fetch.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub html: String,
}

/// Response envelope returned by every scrape surface (HTTP and CLI).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeEnvelope {
    pub success: bool,
    pub data: Option<PageRecord>,
    pub error: Option<String>,
}

impl ScrapeEnvelope {
    pub fn ok(record: PageRecord) -> Self {
        Self {
            success: true,
            data: Some(record),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl From<Result<PageRecord, AppError>> for ScrapeEnvelope {
    fn from(result: Result<PageRecord, AppError>) -> Self {
        match result {
            Ok(record) => Self::ok(record),
            Err(e) => Self::failed(e.envelope_message()),
        }
    }
}
