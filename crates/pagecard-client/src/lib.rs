pub mod config;
pub mod fetcher;

pub use config::FetchConfig;
pub use fetcher::ReqwestFetcher;
