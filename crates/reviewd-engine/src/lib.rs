//! Three-stage AI generation pipeline
//!
//! For each submitted review the orchestrator produces a customer-facing
//! reply, an admin summary, and a list of recommended actions. Every
//! stage degrades independently to deterministic fallback content, so a
//! submission always yields a complete set of outputs no matter how the
//! provider misbehaves.

use serde::Serialize;
use tracing::{debug, warn};

use reviewd_extraction::{RecommendedAction, parse_actions};
use reviewd_llm::LlmClient;
use reviewd_prompts::{
    FALLBACK_ADMIN_SUMMARY, FALLBACK_USER_RESPONSE, PROMPT_VERSION, admin_actions_prompt,
    admin_actions_strict_prompt, admin_summary_prompt, fallback_actions, user_response_prompt,
};

const STAGE_USER_RESPONSE: &str = "user_response";
const STAGE_ADMIN_SUMMARY: &str = "admin_summary";
const STAGE_ADMIN_ACTIONS: &str = "admin_actions";

const NO_CONTENT_ERROR: &str = "provider returned no content";
const RETRY_EXHAUSTED_ERROR: &str = "Failed to parse valid JSON after retry";

/// One review to run the pipeline over. The rating is already validated
/// at the API boundary and the text already truncated.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub rating: u8,
    pub review_text: String,
}

/// Everything the pipeline produced for one submission, fallback content
/// included. `llm_error` is `None` only when all three stages used
/// provider output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AiOutputs {
    pub user_response: String,
    pub admin_summary: String,
    pub recommended_actions: Vec<RecommendedAction>,
    pub llm_provider: String,
    pub llm_model: String,
    pub prompt_version: String,
    pub llm_latency_ms: u64,
    pub llm_error: Option<String>,
}

pub struct Orchestrator {
    client: LlmClient,
}

impl Orchestrator {
    #[must_use]
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Run all three stages for one review.
    ///
    /// Stages run sequentially and never abort each other: a failed reply
    /// does not stop summary or action generation. Reported latency is
    /// the sum over every provider call made, the actions retry included.
    pub async fn generate_all(&self, request: &GenerationRequest) -> AiOutputs {
        let mut latency_ms: u64 = 0;
        let mut errors: Vec<String> = Vec::new();

        let reply = self
            .text_stage(
                STAGE_USER_RESPONSE,
                &user_response_prompt(request.rating, &request.review_text),
                FALLBACK_USER_RESPONSE,
                &mut latency_ms,
                &mut errors,
            )
            .await;

        let summary = self
            .text_stage(
                STAGE_ADMIN_SUMMARY,
                &admin_summary_prompt(request.rating, &request.review_text),
                FALLBACK_ADMIN_SUMMARY,
                &mut latency_ms,
                &mut errors,
            )
            .await;

        let actions = self
            .actions_stage(request, &mut latency_ms, &mut errors)
            .await;

        let llm_error = if errors.is_empty() {
            None
        } else {
            Some(errors.join("; "))
        };

        if let Some(joined) = &llm_error {
            warn!(
                latency_ms,
                errors = %joined,
                "generation pipeline completed with fallbacks"
            );
        } else {
            debug!(latency_ms, "generation pipeline completed");
        }

        AiOutputs {
            user_response: reply,
            admin_summary: summary,
            recommended_actions: actions,
            llm_provider: self.client.provider_name().to_string(),
            llm_model: self.client.model().to_string(),
            prompt_version: PROMPT_VERSION.to_string(),
            llm_latency_ms: latency_ms,
            llm_error,
        }
    }

    /// A plain-text stage: one call, fallback on any failure or empty
    /// output, no retry.
    async fn text_stage(
        &self,
        stage: &str,
        prompt: &str,
        fallback: &str,
        latency_ms: &mut u64,
        errors: &mut Vec<String>,
    ) -> String {
        let result = self.client.generate(prompt).await;
        *latency_ms += result.latency_ms;

        match result.text {
            Some(text) => text,
            None => {
                let reason = result
                    .error
                    .unwrap_or_else(|| NO_CONTENT_ERROR.to_string());
                debug!(stage, reason = %reason, "using fallback content");
                errors.push(format!("{stage}: {reason}"));
                fallback.to_string()
            }
        }
    }

    /// The actions stage retries once, with a stricter prompt, when the
    /// provider answered but the answer failed validation. Transport and
    /// provider errors on the first call go straight to fallback.
    async fn actions_stage(
        &self,
        request: &GenerationRequest,
        latency_ms: &mut u64,
        errors: &mut Vec<String>,
    ) -> Vec<RecommendedAction> {
        let primary = self
            .client
            .generate(&admin_actions_prompt(request.rating, &request.review_text))
            .await;
        *latency_ms += primary.latency_ms;

        if let Some(error) = primary.error {
            errors.push(format!("{STAGE_ADMIN_ACTIONS}: {error}"));
            return fallback_actions();
        }

        let primary_text = primary.text.unwrap_or_default();
        if let Some(actions) = parse_actions(&primary_text) {
            return actions;
        }

        debug!(
            stage = STAGE_ADMIN_ACTIONS,
            "response failed validation, retrying with strict prompt"
        );
        let retry = self
            .client
            .generate(&admin_actions_strict_prompt(
                request.rating,
                &request.review_text,
            ))
            .await;
        *latency_ms += retry.latency_ms;

        if let Some(error) = retry.error {
            errors.push(format!(
                "{STAGE_ADMIN_ACTIONS}: JSON parse failed, retry also failed: {error}"
            ));
            return fallback_actions();
        }

        let retry_text = retry.text.unwrap_or_default();
        match parse_actions(&retry_text) {
            Some(actions) => actions,
            None => {
                errors.push(format!("{STAGE_ADMIN_ACTIONS}: {RETRY_EXHAUSTED_ERROR}"));
                fallback_actions()
            }
        }
    }
}
