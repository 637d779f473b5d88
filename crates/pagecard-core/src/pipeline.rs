use std::time::Duration;

use crate::cascade::{ExtractContext, Strategy, first_success, non_empty};
use crate::document::{RawDocument, visible_text};
use crate::fields::{self, DIVS, LINKS, mailto_address};
use crate::graph;
use crate::models::PageRecord;
use crate::platform::Platform;
use crate::text::{dedupe_lowercase, find_emails, scan_markup_emails};

/// Default wall-clock budget for walking one page's JSON payloads.
pub const DEFAULT_GRAPH_BUDGET: Duration = Duration::from_millis(250);

const CONTACT_KEYWORDS: &[&str] = &["Contact Info", "Email", "Contact"];

/// Email strategies, most specific first. Each yields only validated,
/// lower-cased candidates so an empty result always means "try the next".
const EMAIL: &[Strategy<Vec<String>>] = &[
    Strategy::new("structured", structured_emails),
    Strategy::new("raw_markup", markup_emails),
    Strategy::new("embedded_graph", graph_emails),
    Strategy::new("mailto_any_case", mailto_emails),
    Strategy::new("contact_sections", contact_section_emails),
    Strategy::new("body_text", body_text_emails),
];

/// Turns a parsed page into a [`PageRecord`].
///
/// Every field is extracted independently and best-effort: a field whose
/// strategies all come up empty is left unset, and extraction itself never
/// fails.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    platform: Platform,
    graph_budget: Duration,
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new(Platform::default())
    }
}

impl ExtractionPipeline {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            graph_budget: DEFAULT_GRAPH_BUDGET,
        }
    }

    /// Cap the time spent walking embedded JSON payloads.
    pub fn with_graph_budget(mut self, budget: Duration) -> Self {
        self.graph_budget = budget;
        self
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Parse `html` and extract it.
    pub fn extract_html(&self, html: &str, url: &str) -> PageRecord {
        let document = RawDocument::parse(html);
        self.extract(&document, url)
    }

    pub fn extract(&self, document: &RawDocument<'_>, url: &str) -> PageRecord {
        let ctx = ExtractContext {
            document,
            platform: &self.platform,
            graph_budget: self.graph_budget,
        };

        let mut record = PageRecord::new(url);
        record.page_name = fields::page_name(&ctx);
        record.phone = fields::phone(&ctx);
        record.website = fields::website(&ctx);
        record.address = fields::address(&ctx);
        // Only one email fits the record; further candidates are dropped.
        record.email =
            first_success("email", &ctx, EMAIL).and_then(|found| found.into_iter().next());

        tracing::info!(
            url,
            page_name = record.page_name.is_some(),
            email = record.email.is_some(),
            phone = record.phone.is_some(),
            website = record.website.is_some(),
            address = record.address.is_some(),
            "Extraction complete"
        );

        record
    }
}

fn validated(candidates: Vec<String>) -> Option<Vec<String>> {
    non_empty(dedupe_lowercase(candidates))
}

fn structured_emails(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    fields::email(ctx).and_then(validated)
}

fn markup_emails(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    non_empty(scan_markup_emails(ctx.document.source()))
}

fn graph_emails(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    graph::email(ctx).and_then(validated)
}

/// `mailto:` links regardless of scheme case.
fn mailto_emails(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    let candidates = ctx
        .document
        .tree()
        .select(&LINKS)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| {
            let scheme = href.get(..7)?;
            scheme
                .eq_ignore_ascii_case("mailto:")
                .then(|| mailto_address(&href[7..]))
        })
        .collect();
    validated(candidates)
}

/// Emails inside `div`s that mention contact details.
fn contact_section_emails(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    let candidates = ctx
        .document
        .tree()
        .select(&DIVS)
        .map(visible_text)
        .filter(|text| CONTACT_KEYWORDS.iter().any(|k| text.contains(k)))
        .flat_map(|text| find_emails(&text))
        .collect();
    validated(candidates)
}

fn body_text_emails(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    non_empty(find_emails(ctx.document.body_text()))
}
