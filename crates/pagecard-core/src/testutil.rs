//! Test utilities: handwritten mock of the [`Fetcher`] trait.
//!
//! Uses `Arc<Mutex<_>>` for interior mutability so tests can assert on the
//! URLs that were requested.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::FetchedPage;
use crate::traits::Fetcher;

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns queued responses and records every URL.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML string.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, AppError> {
        self.requested.lock().unwrap().push(url.to_string());

        let next = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok("<html><body>default</body></html>".to_string())
            } else {
                responses.remove(0)
            }
        };

        next.map(|html| FetchedPage {
            url: url.to_string(),
            status: 200,
            html,
        })
    }
}
