//! Submission persistence and analytics
//!
//! The [`SubmissionStore`] trait is the seam between the HTTP layer and
//! whatever holds the data; [`MemoryStore`] is the in-process
//! implementation backed by a `tokio::sync::RwLock`.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use reviewd_extraction::RecommendedAction;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// A submission with its generated outputs, ready to persist.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub rating: u8,
    pub review_text: String,
    pub user_response: String,
    pub admin_summary: String,
    pub recommended_actions: Vec<RecommendedAction>,
    pub llm_provider: String,
    pub llm_model: String,
    pub prompt_version: String,
    pub llm_latency_ms: u64,
    pub llm_error: Option<String>,
}

/// A stored submission record.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: i64,
    pub rating: u8,
    pub review_text: String,
    pub user_response: String,
    pub admin_summary: String,
    pub recommended_actions: Vec<RecommendedAction>,
    pub llm_provider: String,
    pub llm_model: String,
    pub prompt_version: String,
    pub llm_latency_ms: u64,
    pub llm_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingCount {
    pub rating: u8,
    pub count: u64,
    /// Share of all submissions, rounded to one decimal place.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyVolume {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub count: u64,
}

/// Dashboard aggregates over all stored submissions.
#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub total_submissions: u64,
    /// Mean rating rounded to two decimals, 0.0 when empty.
    pub average_rating: f64,
    /// One entry per rating 1 through 5, always all five.
    pub rating_distribution: Vec<RatingCount>,
    /// Last seven days, oldest first, today included.
    pub daily_volume: Vec<DailyVolume>,
    pub today_count: u64,
    pub this_week_count: u64,
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist a submission, assigning its id and timestamp.
    async fn insert(&self, submission: NewSubmission) -> Result<Submission, StoreError>;

    /// Most recent submissions, newest first, at most `limit`.
    async fn recent(&self, limit: usize) -> Result<Vec<Submission>, StoreError>;

    /// Aggregates for the admin dashboard.
    async fn analytics(&self) -> Result<Analytics, StoreError>;
}

/// In-process store. Suitable for a single instance; a database-backed
/// implementation slots in behind the same trait.
pub struct MemoryStore {
    submissions: RwLock<Vec<Submission>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            submissions: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    async fn insert_at(
        &self,
        submission: NewSubmission,
        created_at: DateTime<Utc>,
    ) -> Submission {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = Submission {
            id,
            rating: submission.rating,
            review_text: submission.review_text,
            user_response: submission.user_response,
            admin_summary: submission.admin_summary,
            recommended_actions: submission.recommended_actions,
            llm_provider: submission.llm_provider,
            llm_model: submission.llm_model,
            prompt_version: submission.prompt_version,
            llm_latency_ms: submission.llm_latency_ms,
            llm_error: submission.llm_error,
            created_at,
        };
        self.submissions.write().await.push(record.clone());
        debug!(id, rating = record.rating, "stored submission");
        record
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn insert(&self, submission: NewSubmission) -> Result<Submission, StoreError> {
        Ok(self.insert_at(submission, Utc::now()).await)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Submission>, StoreError> {
        let submissions = self.submissions.read().await;
        Ok(submissions.iter().rev().take(limit).cloned().collect())
    }

    async fn analytics(&self) -> Result<Analytics, StoreError> {
        let submissions = self.submissions.read().await;
        let total = submissions.len() as u64;

        let average_rating = if total == 0 {
            0.0
        } else {
            let sum: u64 = submissions.iter().map(|s| u64::from(s.rating)).sum();
            round_to(sum as f64 / total as f64, 2)
        };

        let rating_distribution = (1..=5u8)
            .map(|rating| {
                let count = submissions.iter().filter(|s| s.rating == rating).count() as u64;
                let percentage = if total == 0 {
                    0.0
                } else {
                    round_to(count as f64 / total as f64 * 100.0, 1)
                };
                RatingCount {
                    rating,
                    count,
                    percentage,
                }
            })
            .collect();

        let today = Utc::now().date_naive();
        let day_count = |day: NaiveDate| {
            submissions
                .iter()
                .filter(|s| s.created_at.date_naive() == day)
                .count() as u64
        };

        // oldest first, today last
        let daily_volume = (0..7u64)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|day| DailyVolume {
                date: day.format("%Y-%m-%d").to_string(),
                count: day_count(day),
            })
            .collect();

        let today_count = day_count(today);
        let week_start = today.checked_sub_days(Days::new(6)).unwrap_or(today);
        let this_week_count = submissions
            .iter()
            .filter(|s| s.created_at.date_naive() >= week_start)
            .count() as u64;

        Ok(Analytics {
            total_submissions: total,
            average_rating,
            rating_distribution,
            daily_volume,
            today_count,
            this_week_count,
        })
    }
}
