use pagecard_core::{Fetcher, ScrapeService};

/// Shared application state, available to all route handlers via `State<Arc<AppState<F>>>`.
pub struct AppState<F: Fetcher> {
    pub scraper: ScrapeService<F>,
}

impl<F: Fetcher> AppState<F> {
    pub fn new(scraper: ScrapeService<F>) -> Self {
        Self { scraper }
    }
}
