//! Structured-action extraction from untrusted LLM output
//!
//! Generated text is *expected* to contain a JSON array of recommended
//! actions, but the generator is non-deterministic: the text may be wrapped
//! in a markdown code fence, may not be JSON at all, or may contain elements
//! that don't match the schema. [`parse_actions`] turns that text into
//! either a non-empty validated list or a definitive `None` — it never
//! panics and never partially trusts malformed input.
//!
//! The only repair heuristic applied is stripping a single layer of code
//! fencing. Broader "smart" repair of malformed output is deliberately out
//! of scope; anything else invalid falls through to the caller's retry and
//! fallback policy.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Urgency of a recommended action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Team responsible for a recommended action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    Support,
    Ops,
    Product,
}

impl Owner {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "support" => Some(Self::Support),
            "ops" => Some(Self::Ops),
            "product" => Some(Self::Product),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Ops => "ops",
            Self::Product => "product",
        }
    }
}

/// A single validated follow-up action recommended for a review.
///
/// Validity is intrinsic: an object missing a field, or with a field
/// outside its enum, is not a `RecommendedAction` and gets discarded during
/// extraction rather than coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub action: String,
    pub priority: Priority,
    pub owner: Owner,
}

static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(?:json)?\n?").unwrap());
static FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n?```$").unwrap());

/// Strip a single layer of markdown code fencing, if present.
///
/// Only text that *starts* with a fence marker is touched; an optional
/// `json` language tag on the opening fence is accepted.
fn strip_code_fence(text: &str) -> &str {
    if !text.starts_with("```") {
        return text;
    }
    let without_open = match FENCE_OPEN.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    let stripped = match FENCE_CLOSE.find(without_open) {
        Some(m) => &without_open[..m.start()],
        None => without_open,
    };
    stripped.trim()
}

/// Validate one parsed JSON element against the action schema.
///
/// Requires all three keys; `priority` and `owner` must match their enums
/// exactly. The `action` value is coerced to a string when it is some other
/// JSON scalar, mirroring a lenient reading of otherwise well-shaped items.
fn validate_element(value: &serde_json::Value) -> Option<RecommendedAction> {
    let obj = value.as_object()?;

    let action = match obj.get("action")? {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let priority = Priority::parse(obj.get("priority")?.as_str()?)?;
    let owner = Owner::parse(obj.get("owner")?.as_str()?)?;

    Some(RecommendedAction {
        action,
        priority,
        owner,
    })
}

/// Parse and validate recommended actions from raw generated text.
///
/// Returns `Some` with the surviving elements (order preserved) when at
/// least one element passes validation, `None` otherwise. Invalid elements
/// are dropped individually; the array as a whole is only rejected when the
/// text is empty, not JSON, not an array, or nothing survives filtering.
#[must_use]
pub fn parse_actions(text: &str) -> Option<Vec<RecommendedAction>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = strip_code_fence(trimmed);

    let parsed: serde_json::Value = match serde_json::from_str(candidate) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, "action extraction failed: not valid JSON");
            return None;
        }
    };

    let elements = parsed.as_array()?;
    let validated: Vec<RecommendedAction> =
        elements.iter().filter_map(validate_element).collect();

    if validated.len() < elements.len() {
        debug!(
            total = elements.len(),
            kept = validated.len(),
            "dropped actions failing schema validation"
        );
    }

    if validated.is_empty() {
        None
    } else {
        Some(validated)
    }
}
