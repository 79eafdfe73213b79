//! HTTP surface
//!
//! Thin axum handlers over the orchestrator and store. Validation that
//! belongs to the transport lives here (rating range, text trimming and
//! truncation); everything downstream assumes clean input.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use reviewd_engine::{GenerationRequest, Orchestrator};
use reviewd_extraction::RecommendedAction;
use reviewd_store::{Analytics, NewSubmission, StoreError, Submission, SubmissionStore};

/// Longest review text accepted; anything longer is truncated, not
/// rejected.
const MAX_REVIEW_CHARS: usize = 2000;

const DEFAULT_LIST_LIMIT: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub store: Arc<dyn SubmissionStore>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/v1/submissions", post(create_submission).get(list_submissions))
        .route("/v1/analytics", get(get_analytics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Validation(String),
    Server(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Server(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message),
            Self::Server(message) => {
                error!(message = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "SERVER_ERROR", message)
            }
        };
        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    message: &'static str,
    version: &'static str,
    health_check: &'static str,
}

async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "reviewd API",
        version: env!("CARGO_PKG_VERSION"),
        health_check: "/health",
    })
}

#[derive(Debug, Deserialize)]
struct CreateSubmission {
    rating: i64,
    review_text: String,
}

#[derive(Debug, Serialize)]
struct SubmissionView {
    id: i64,
    rating: u8,
    review_text: String,
    user_response: String,
    admin_summary: String,
    admin_recommended_actions: Vec<RecommendedAction>,
    created_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionView {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            rating: s.rating,
            review_text: s.review_text,
            user_response: s.user_response,
            admin_summary: s.admin_summary,
            admin_recommended_actions: s.recommended_actions,
            created_at: s.created_at,
        }
    }
}

/// Rejects out-of-range ratings and empty text, truncates overlong text.
fn validate(payload: CreateSubmission) -> Result<GenerationRequest, ApiError> {
    let rating = u8::try_from(payload.rating)
        .ok()
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| ApiError::Validation("rating must be between 1 and 5".to_string()))?;

    let trimmed = payload.review_text.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(
            "review_text cannot be empty".to_string(),
        ));
    }

    let review_text = if trimmed.chars().count() > MAX_REVIEW_CHARS {
        trimmed.chars().take(MAX_REVIEW_CHARS).collect()
    } else {
        trimmed.to_string()
    };

    Ok(GenerationRequest {
        rating,
        review_text,
    })
}

async fn create_submission(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubmission>,
) -> Result<Json<SubmissionView>, ApiError> {
    let request = validate(payload)?;

    let outputs = state.orchestrator.generate_all(&request).await;

    let stored = state
        .store
        .insert(NewSubmission {
            rating: request.rating,
            review_text: request.review_text,
            user_response: outputs.user_response,
            admin_summary: outputs.admin_summary,
            recommended_actions: outputs.recommended_actions,
            llm_provider: outputs.llm_provider,
            llm_model: outputs.llm_model,
            prompt_version: outputs.prompt_version,
            llm_latency_ms: outputs.llm_latency_ms,
            llm_error: outputs.llm_error,
        })
        .await?;

    info!(
        id = stored.id,
        rating = stored.rating,
        latency_ms = stored.llm_latency_ms,
        degraded = stored.llm_error.is_some(),
        "submission created"
    );

    Ok(Json(stored.into()))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SubmissionList {
    submissions: Vec<SubmissionView>,
    total: usize,
}

async fn list_submissions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<SubmissionList>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let submissions = state.store.recent(limit).await?;
    let total = submissions.len();
    Ok(Json(SubmissionList {
        submissions: submissions.into_iter().map(Into::into).collect(),
        total,
    }))
}

async fn get_analytics(State(state): State<AppState>) -> Result<Json<Analytics>, ApiError> {
    Ok(Json(state.store.analytics().await?))
}
