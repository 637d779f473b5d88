//! Ordered "first success wins" strategy lists.
//!
//! Every field is extracted by a fixed list of strategies, most specific
//! first. A strategy returns `None` when it has nothing to offer, which
//! hands control to the next one; the first `Some` short-circuits the rest.

use std::time::Duration;

use crate::document::RawDocument;
use crate::platform::Platform;

/// Everything a strategy may look at.
pub struct ExtractContext<'a> {
    pub document: &'a RawDocument<'a>,
    pub platform: &'a Platform,
    /// Wall-clock budget for the embedded-graph tree walk.
    pub graph_budget: Duration,
}

/// A named extraction technique.
pub struct Strategy<T> {
    pub name: &'static str,
    pub run: fn(&ExtractContext<'_>) -> Option<T>,
}

impl<T> Strategy<T> {
    pub const fn new(name: &'static str, run: fn(&ExtractContext<'_>) -> Option<T>) -> Self {
        Self { name, run }
    }
}

/// Run `strategies` in order and return the first hit.
pub fn first_success<T>(
    field: &'static str,
    ctx: &ExtractContext<'_>,
    strategies: &[Strategy<T>],
) -> Option<T> {
    strategies.iter().find_map(|strategy| {
        let found = (strategy.run)(ctx);
        if found.is_some() {
            tracing::debug!(field, strategy = strategy.name, "Field found");
        }
        found
    })
}

/// `Some(items)` unless `items` is empty, so list-valued strategies can take
/// part in a cascade.
pub fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static CALLS_AFTER_HIT: AtomicUsize = AtomicUsize::new(0);

    fn nothing(_: &ExtractContext<'_>) -> Option<String> {
        None
    }

    fn title(ctx: &ExtractContext<'_>) -> Option<String> {
        ctx.document
            .source()
            .contains("<title>")
            .then(|| "from title".to_string())
    }

    fn counted(_: &ExtractContext<'_>) -> Option<String> {
        CALLS_AFTER_HIT.fetch_add(1, Ordering::SeqCst);
        Some("late".to_string())
    }

    fn with_ctx(html: &str, f: impl FnOnce(&ExtractContext<'_>)) {
        let document = RawDocument::parse(html);
        let platform = Platform::default();
        let ctx = ExtractContext {
            document: &document,
            platform: &platform,
            graph_budget: Duration::from_millis(100),
        };
        f(&ctx);
    }

    #[test]
    fn test_first_hit_short_circuits() {
        with_ctx("<html><head><title>x</title></head></html>", |ctx| {
            let strategies = [
                Strategy::new("nothing", nothing),
                Strategy::new("title", title),
                Strategy::new("counted", counted),
            ];
            assert_eq!(
                first_success("name", ctx, &strategies),
                Some("from title".to_string())
            );
            assert_eq!(CALLS_AFTER_HIT.load(Ordering::SeqCst), 0);
        });
    }

    #[test]
    fn test_all_miss_is_none() {
        with_ctx("<html></html>", |ctx| {
            let strategies = [Strategy::new("nothing", nothing), Strategy::new("title", title)];
            assert_eq!(first_success("name", ctx, &strategies), None);
        });
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Vec::<u8>::new()), None);
        assert_eq!(non_empty(vec![1]), Some(vec![1]));
    }
}
