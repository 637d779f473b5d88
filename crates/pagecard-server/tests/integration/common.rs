use std::sync::{Arc, Mutex};

use axum::Router;

use pagecard_core::{AppError, FetchedPage, Fetcher, ScrapeService};
use pagecard_server::routes;
use pagecard_server::state::AppState;

pub const TEST_PAGE: &str = r#"
    <html>
        <head><title>Test Page - Facebook</title></head>
        <body>
            <h1>Test Page</h1>
            <div>
                <a href="mailto:test@example.com">Email us</a>
                <a href="tel:+1234567890">Call us</a>
                <a href="https://www.example.com">Visit our website</a>
            </div>
            <div>Address: 12 Harbour Road, Portsmouth</div>
        </body>
    </html>
"#;

/// Fetcher that answers every request with one canned result.
#[derive(Clone)]
pub struct StubFetcher {
    response: Arc<Mutex<Option<Result<String, AppError>>>>,
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl StubFetcher {
    pub fn html(html: &str) -> Self {
        Self::with(Ok(html.to_string()))
    }

    pub fn failing(error: AppError) -> Self {
        Self::with(Err(error))
    }

    fn with(response: Result<String, AppError>) -> Self {
        Self {
            response: Arc::new(Mutex::new(Some(response))),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, AppError> {
        self.requested.lock().unwrap().push(url.to_string());
        let response = self
            .response
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(String::new()));
        response.map(|html| FetchedPage {
            url: url.to_string(),
            status: 200,
            html,
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub fetcher: StubFetcher,
}

pub fn setup_test_app(fetcher: StubFetcher) -> TestApp {
    let state = Arc::new(AppState::new(ScrapeService::new(fetcher.clone())));
    TestApp {
        router: routes::router(state),
        fetcher,
    }
}
