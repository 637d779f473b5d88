use std::future::Future;

use crate::error::AppError;
use crate::models::FetchedPage;

/// Fetches a page over the network.
///
/// Implementations own everything transport-related (headers, user agent,
/// timeouts); the extraction engine only ever sees the returned
/// [`FetchedPage`].
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, AppError>> + Send;
}
