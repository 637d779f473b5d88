//! Selector-based extraction of one contact field at a time from the parsed
//! page tree.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use scraper::Selector;
use url::Url;

use crate::cascade::{ExtractContext, Strategy, first_success};
use crate::document::visible_text;
use crate::text::{find_emails, is_valid_email, normalize_whitespace};

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static MAILTO_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href^="mailto:"]"#).unwrap());
static TEL_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href^="tel:"]"#).unwrap());
pub(crate) static LINKS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
pub(crate) static DIVS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").unwrap());

/// Country code, then 3-3-4 digits with optional separators.
///
/// Deliberately loose: any digit run of the right shape matches, including
/// ones that are not phone numbers.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+\d{1,3})?[\s.-]?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}").unwrap()
});

const ADDRESS_KEYWORDS: &[&str] = &["Address", "Location"];
const MIN_ADDRESS_LEN: usize = 10;

const NAME: &[Strategy<String>] = &[
    Strategy::new("title", name_from_title),
    Strategy::new("h1", name_from_heading),
];

const EMAIL: &[Strategy<Vec<String>>] = &[
    Strategy::new("mailto", email_from_mailto),
    Strategy::new("body_text", email_from_body_text),
];

const PHONE: &[Strategy<String>] = &[
    Strategy::new("tel", phone_from_tel),
    Strategy::new("body_text", phone_from_body_text),
];

const WEBSITE: &[Strategy<String>] = &[Strategy::new("external_link", website_from_links)];

const ADDRESS: &[Strategy<String>] = &[Strategy::new("keyword_div", address_from_sections)];

pub fn page_name(ctx: &ExtractContext<'_>) -> Option<String> {
    first_success("page_name", ctx, NAME)
}

/// Candidate emails from the page's structured markup, best first.
pub fn email(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    first_success("email", ctx, EMAIL)
}

pub fn phone(ctx: &ExtractContext<'_>) -> Option<String> {
    first_success("phone", ctx, PHONE)
}

pub fn website(ctx: &ExtractContext<'_>) -> Option<String> {
    first_success("website", ctx, WEBSITE)
}

pub fn address(ctx: &ExtractContext<'_>) -> Option<String> {
    first_success("address", ctx, ADDRESS)
}

// ---------------------------------------------------------------------------
// Name
// ---------------------------------------------------------------------------

fn name_from_title(ctx: &ExtractContext<'_>) -> Option<String> {
    let title = ctx.document.tree().select(&TITLE).next()?;
    let text: String = title.text().collect();
    let suffix = site_suffix_regex(&ctx.platform.site_name)?;
    let name = suffix.replace(text.trim(), "");
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn name_from_heading(ctx: &ExtractContext<'_>) -> Option<String> {
    let heading = ctx.document.tree().select(&H1).next()?;
    let name = normalize_whitespace(&visible_text(heading));
    (!name.is_empty()).then_some(name)
}

/// Matches a trailing `" - <site>"` or `" | <site>"`, any case.
fn site_suffix_regex(site_name: &str) -> Option<Regex> {
    RegexBuilder::new(&format!(r"\s*[-|]\s*{}\s*$", regex::escape(site_name)))
        .case_insensitive(true)
        .build()
        .ok()
}

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

fn email_from_mailto(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    let address = ctx
        .document
        .tree()
        .select(&MAILTO_LINKS)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| href.strip_prefix("mailto:").map(mailto_address))
        .find(|address| is_valid_email(address))?;
    Some(vec![address])
}

fn email_from_body_text(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    let first = find_emails(ctx.document.body_text()).into_iter().next()?;
    Some(vec![first])
}

/// Address part of a `mailto:` target, without any `?subject=...` query.
pub(crate) fn mailto_address(target: &str) -> String {
    target.split('?').next().unwrap_or_default().trim().to_string()
}

// ---------------------------------------------------------------------------
// Phone
// ---------------------------------------------------------------------------

fn phone_from_tel(ctx: &ExtractContext<'_>) -> Option<String> {
    ctx.document
        .tree()
        .select(&TEL_LINKS)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| href.strip_prefix("tel:"))
        .map(str::trim)
        .find(|phone| !phone.is_empty())
        .map(str::to_string)
}

fn phone_from_body_text(ctx: &ExtractContext<'_>) -> Option<String> {
    PHONE_RE
        .find(ctx.document.body_text())
        .map(|m| m.as_str().trim().to_string())
}

// ---------------------------------------------------------------------------
// Website
// ---------------------------------------------------------------------------

fn website_from_links(ctx: &ExtractContext<'_>) -> Option<String> {
    ctx.document
        .tree()
        .select(&LINKS)
        .filter_map(|link| link.value().attr("href"))
        .find(|href| is_external_link(href, &ctx.platform.domain))
        .map(str::to_string)
}

fn is_external_link(href: &str, platform_domain: &str) -> bool {
    if href.starts_with('/') {
        return false;
    }
    let Ok(url) = Url::parse(href) else {
        return false;
    };
    matches!(url.scheme(), "http" | "https")
        && url
            .host_str()
            .is_some_and(|host| !host.contains(platform_domain))
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

fn address_from_sections(ctx: &ExtractContext<'_>) -> Option<String> {
    ctx.document.tree().select(&DIVS).find_map(|div| {
        let text = normalize_whitespace(&visible_text(div));
        let mentions_address = ADDRESS_KEYWORDS.iter().any(|k| text.contains(k));
        (mentions_address && text.chars().count() > MIN_ADDRESS_LEN).then_some(text)
    })
}
