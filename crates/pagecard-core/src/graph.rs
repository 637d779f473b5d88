//! Email lookup inside the inline JSON data blocks pages ship with.
//!
//! Two strategies, cheapest first:
//!
//! 1. a single regex over the payload text for the `profile_email` field
//!    signature, no parsing involved;
//! 2. a full parse followed by a guarded walk down
//!    `require[*][3][*].__bbox.result.data.user.about_app_sections.nodes[*]
//!    .activeCollections.nodes[*].style_renderer.profile_field_sections[*]
//!    .profile_fields.nodes[*]`.
//!
//! The payload schema is undocumented and changes without notice. Every step
//! of the walk tolerates a missing key, a wrong type or an empty list by
//! skipping that branch only.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use regex::Regex;
use serde_json::Value;

use crate::cascade::{ExtractContext, Strategy, first_success, non_empty};
use crate::text::{is_valid_email, unescape_at_sign};

/// `field_type` of the profile field holding the contact email.
pub const EMAIL_FIELD_TYPE: &str = "profile_email";

static EMAIL_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""field_type":"profile_email"[^}]+?"title":\{[^}]*"text":"([^"]+)""#).unwrap()
});

const GRAPH: &[Strategy<Vec<String>>] = &[
    Strategy::new("direct_pattern", direct_strategy),
    Strategy::new("structural_walk", structural_strategy),
];

/// Candidate emails from the page's inline JSON payloads.
pub fn email(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    first_success("email.graph", ctx, GRAPH)
}

fn email_payloads(ctx: &ExtractContext<'_>) -> Vec<String> {
    ctx.document
        .json_payloads()
        .filter(|payload| payload.contains(EMAIL_FIELD_TYPE))
        .collect()
}

fn direct_strategy(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    email_payloads(ctx)
        .iter()
        .find_map(|payload| direct_match(payload))
        .map(|email| vec![email])
}

fn structural_strategy(ctx: &ExtractContext<'_>) -> Option<Vec<String>> {
    let deadline = deadline_after(ctx.graph_budget);
    let mut found = Vec::new();

    for payload in email_payloads(ctx) {
        let root: Value = match serde_json::from_str(payload.trim()) {
            Ok(root) => root,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unparseable JSON payload");
                continue;
            }
        };
        let mut walk = GraphWalk::until(deadline);
        walk.visit_root(&root);
        found.append(&mut walk.found);
        if walk.expired {
            break;
        }
    }

    non_empty(found.into_iter().filter(|e| is_valid_email(e)).collect())
}

/// Match the profile-email signature directly in `payload` text.
///
/// Returns the first captured value that is a valid email once the escaped
/// at-sign is decoded.
pub fn direct_match(payload: &str) -> Option<String> {
    EMAIL_FIELD_RE
        .captures_iter(payload)
        .map(|caps| unescape_at_sign(&caps[1]))
        .find(|email| is_valid_email(email))
}

/// Walk a parsed payload and collect every profile-email value, stopping
/// early once `budget` has elapsed.
pub fn walk_graph(root: &Value, budget: Duration) -> Vec<String> {
    let mut walk = GraphWalk::until(deadline_after(budget));
    walk.visit_root(root);
    walk.found
}

/// `None` when `budget` reaches past what `Instant` can represent, which
/// means the walk is unbounded.
fn deadline_after(budget: Duration) -> Option<Instant> {
    Instant::now().checked_add(budget)
}

/// Iterate the array at `node` (if it is one).
fn items(node: Option<&Value>) -> impl Iterator<Item = &Value> {
    node.and_then(Value::as_array).into_iter().flatten()
}

struct GraphWalk {
    deadline: Option<Instant>,
    expired: bool,
    found: Vec<String>,
}

impl GraphWalk {
    fn until(deadline: Option<Instant>) -> Self {
        Self {
            deadline,
            expired: false,
            found: Vec::new(),
        }
    }

    /// True once the deadline has passed. Logs once.
    fn out_of_time(&mut self) -> bool {
        let passed = self.deadline.is_some_and(|d| Instant::now() >= d);
        if !self.expired && passed {
            tracing::warn!(
                collected = self.found.len(),
                "JSON graph walk ran out of time, returning partial result"
            );
            self.expired = true;
        }
        self.expired
    }

    fn visit_root(&mut self, root: &Value) {
        for entry in items(root.get("require")) {
            // Module calls look like [name, method, args, [boxed objects...]].
            for object in items(entry.get(3)) {
                if let Some(user) = object.pointer("/__bbox/result/data/user") {
                    self.visit_user(user);
                }
                if self.out_of_time() {
                    return;
                }
            }
        }
    }

    fn visit_user(&mut self, user: &Value) {
        for section in items(user.pointer("/about_app_sections/nodes")) {
            for collection in items(section.pointer("/activeCollections/nodes")) {
                let field_sections =
                    collection.pointer("/style_renderer/profile_field_sections");
                for field_section in items(field_sections) {
                    if self.out_of_time() {
                        return;
                    }
                    for field in items(field_section.pointer("/profile_fields/nodes")) {
                        self.visit_field(field);
                    }
                }
            }
        }
    }

    fn visit_field(&mut self, field: &Value) {
        let is_email = field.get("field_type").and_then(Value::as_str) == Some(EMAIL_FIELD_TYPE);
        if !is_email {
            return;
        }
        if let Some(text) = field.pointer("/title/text").and_then(Value::as_str) {
            if !text.is_empty() {
                self.found.push(unescape_at_sign(text));
            }
        }
    }
}
