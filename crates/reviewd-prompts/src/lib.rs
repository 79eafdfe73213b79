//! Prompt templates and fallback content for review enrichment
//!
//! Each of the three generation stages (user response, admin summary,
//! admin actions) has its own template, interpolated with the submission's
//! rating and review text. The actions stage additionally has a stricter
//! variant used for its single retry when the first response fails JSON
//! validation.
//!
//! Fallbacks are static and deterministic: they are substituted whenever a
//! stage cannot produce valid output, so downstream consumers can rely on
//! every AI field always being populated.

use reviewd_extraction::{Owner, Priority, RecommendedAction};

/// Version tag stored alongside every generated output. Bump when any
/// template below changes in a way that affects generated content.
pub const PROMPT_VERSION: &str = "v1";

/// Fallback customer-facing reply.
pub const FALLBACK_USER_RESPONSE: &str = "Thank you for your feedback. Our team will review your comments and get back to you if needed.";

/// Fallback admin summary.
pub const FALLBACK_ADMIN_SUMMARY: &str =
    "Review requires manual analysis - AI processing unavailable.";

/// Fallback action list, substituted when both actions attempts fail.
#[must_use]
pub fn fallback_actions() -> Vec<RecommendedAction> {
    vec![RecommendedAction {
        action: "Review manually".to_string(),
        priority: Priority::High,
        owner: Owner::Support,
    }]
}

/// Prompt for the customer-facing reply.
#[must_use]
pub fn user_response_prompt(rating: u8, review_text: &str) -> String {
    format!(
        "You are a customer support assistant for an online store. A customer left a \
         {rating}-star review (out of 5):\n\n\"{review_text}\"\n\nWrite a short, warm, \
         professional reply to the customer (2-3 sentences). Thank them for the feedback, \
         acknowledge their specific experience, and if the review is negative, apologize \
         and reassure them. Do not promise refunds or specific compensation. Reply with \
         only the response text, no preamble."
    )
}

/// Prompt for the internal admin summary.
#[must_use]
pub fn admin_summary_prompt(rating: u8, review_text: &str) -> String {
    format!(
        "Summarize the following {rating}-star customer review for an internal admin \
         dashboard in one or two sentences. Be factual and specific about the issue or \
         praise; do not address the customer.\n\nReview:\n\"{review_text}\"\n\nReply with \
         only the summary text."
    )
}

/// Primary prompt for recommended actions. Asks for a JSON array matching
/// the action schema.
#[must_use]
pub fn admin_actions_prompt(rating: u8, review_text: &str) -> String {
    format!(
        "A customer left a {rating}-star review (out of 5):\n\n\"{review_text}\"\n\n\
         Recommend 1 to 3 concrete follow-up actions for our internal teams. Respond with \
         a JSON array where each element has exactly these fields:\n\
         - \"action\": short imperative description\n\
         - \"priority\": one of \"low\", \"medium\", \"high\"\n\
         - \"owner\": one of \"support\", \"ops\", \"product\"\n\n\
         Example: [{{\"action\": \"Contact the customer\", \"priority\": \"high\", \
         \"owner\": \"support\"}}]"
    )
}

/// Stricter actions prompt used for the single retry after a validation
/// failure. Pins the output format harder than the primary prompt.
#[must_use]
pub fn admin_actions_strict_prompt(rating: u8, review_text: &str) -> String {
    format!(
        "Rating: {rating}/5\nReview: \"{review_text}\"\n\n\
         Output ONLY a raw JSON array of 1 to 3 action objects. No markdown, no code \
         fences, no explanation, no text before or after the array. Each object must have \
         exactly the keys \"action\" (string), \"priority\" (\"low\"|\"medium\"|\"high\") \
         and \"owner\" (\"support\"|\"ops\"|\"product\"). Any other output is an error."
    )
}
