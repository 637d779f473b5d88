use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
static JSON_SCRIPTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/json"]"#).unwrap());

/// Elements whose text is never visible on the rendered page.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// A fetched page: the raw markup together with its parsed tree.
///
/// Owned by a single extraction call. `scraper::Html` is not `Send`, so a
/// `RawDocument` must never be held across an `.await`.
pub struct RawDocument<'a> {
    source: &'a str,
    tree: Html,
    body_text: String,
}

impl<'a> RawDocument<'a> {
    /// Parse `source` as an HTML document. Never fails: malformed markup
    /// yields whatever tree html5ever recovers.
    pub fn parse(source: &'a str) -> Self {
        let tree = Html::parse_document(source);
        let body_text = tree
            .select(&BODY)
            .next()
            .map(|body| visible_text(body))
            .unwrap_or_default();

        Self {
            source,
            tree,
            body_text,
        }
    }

    /// The raw markup as fetched.
    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn tree(&self) -> &Html {
        &self.tree
    }

    /// Visible text of `<body>`: every non-blank text node, trimmed and
    /// joined with single spaces.
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// Text content of every inline JSON data block.
    pub fn json_payloads(&self) -> impl Iterator<Item = String> + '_ {
        self.tree
            .select(&JSON_SCRIPTS)
            .map(|script| script.text().collect::<String>())
    }
}

/// Visible text below `element`, one entry per non-blank text node.
pub fn stripped_strings(element: ElementRef<'_>) -> Vec<&str> {
    let mut out = Vec::new();
    collect_strings(element, &mut out);
    out
}

/// [`stripped_strings`] joined with single spaces.
pub fn visible_text(element: ElementRef<'_>) -> String {
    stripped_strings(element).join(" ")
}

fn collect_strings<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed);
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !INVISIBLE_TAGS.contains(&child_element.value().name()) {
                collect_strings(child_element, out);
            }
        }
    }
}
