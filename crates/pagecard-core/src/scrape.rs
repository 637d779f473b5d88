use crate::error::AppError;
use crate::models::{PageRecord, ScrapeEnvelope};
use crate::pipeline::ExtractionPipeline;
use crate::traits::Fetcher;

/// Orchestrates one scrape: normalize the URL → fetch → extract.
///
/// Generic over the fetcher so the whole flow runs in tests without any
/// network access.
pub struct ScrapeService<F: Fetcher> {
    fetcher: F,
    pipeline: ExtractionPipeline,
}

impl<F: Fetcher> ScrapeService<F> {
    /// Create a ScrapeService with the default (Facebook) pipeline.
    pub fn new(fetcher: F) -> Self {
        Self::with_pipeline(fetcher, ExtractionPipeline::default())
    }

    pub fn with_pipeline(fetcher: F, pipeline: ExtractionPipeline) -> Self {
        Self { fetcher, pipeline }
    }

    pub fn pipeline(&self) -> &ExtractionPipeline {
        &self.pipeline
    }

    /// Scrape the About page of `url`.
    ///
    /// Only fetch failures surface as errors. Once the page is in hand every
    /// field is resolved best-effort and the record is always returned.
    pub async fn scrape(&self, url: &str) -> Result<PageRecord, AppError> {
        let platform = self.pipeline.platform();
        if !platform.is_known_url(url) {
            tracing::warn!(
                url,
                "URL is not on a known {} host, scraping anyway",
                platform.site_name
            );
        }

        let target = platform.about_url(url);
        tracing::info!("Fetching {}", target);
        let page = self.fetcher.fetch(&target).await?;
        tracing::info!(
            status = page.status,
            final_url = %page.url,
            "Fetched {} bytes of HTML",
            page.html.len()
        );

        Ok(self.pipeline.extract_html(&page.html, &target))
    }

    /// [`scrape`](Self::scrape), folded into the response envelope.
    pub async fn scrape_envelope(&self, url: &str) -> ScrapeEnvelope {
        let result = self.scrape(url).await;
        if let Err(e) = &result {
            tracing::error!(url, error = %e, "Scrape failed");
        }
        ScrapeEnvelope::from(result)
    }
}
