pub mod cascade;
pub mod document;
pub mod error;
pub mod fields;
pub mod graph;
pub mod models;
pub mod pipeline;
pub mod platform;
pub mod scrape;
pub mod text;
pub mod traits;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::AppError;
pub use models::{FetchedPage, PageRecord, ScrapeEnvelope};
pub use pipeline::ExtractionPipeline;
pub use platform::Platform;
pub use scrape::ScrapeService;
pub use traits::Fetcher;
