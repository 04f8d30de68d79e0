//! Outbound sinks a submission is delivered to: the record store that keeps
//! the row, and the webhook that notifies downstream automation.

mod memory;
mod supabase;
mod webhook;

pub use memory::MemoryRecordStore;
pub use memory::MemoryWebhook;
pub use supabase::SupabaseRecordStore;
pub use webhook::HttpWebhookSink;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::contact::ContactSubmission;
use crate::questionnaire::Answer;
use crate::questionnaire::MatchType;

pub const SUBMISSIONS_COLLECTION: &str = "submissions";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Row written to the record store.
///
/// Column names are historical and do not all describe the answer they hold;
/// see the `From<&ContactSubmission>` impl for the mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub name: String,
    pub email: String,
    pub monthly_spend: u32,
    pub estimated_waste: String,
    pub target_impression_share: Answer,
    pub incrementality_testing: Answer,
    pub broad_match: Answer,
    pub search_terms_review: MatchType,
}

impl From<&ContactSubmission> for SubmissionRecord {
    fn from(submission: &ContactSubmission) -> Self {
        let answers = &submission.answers;
        Self {
            name: submission.name.clone(),
            email: submission.email.clone(),
            monthly_spend: answers.monthly_spend.dollars(),
            estimated_waste: submission.estimated_waste.clone(),
            target_impression_share: answers.uses_smart_bidding,
            incrementality_testing: answers.brand_cpc_near_nonbrand,
            broad_match: answers.high_impression_share,
            search_terms_review: answers.match_type_predominant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAnswers {
    pub smart_bidding: Answer,
    pub performance_target: Answer,
    pub brand_cpc: Answer,
    pub impression_share: Answer,
    pub match_type: MatchType,
}

/// Body posted to the automation webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub name: String,
    pub email: String,
    pub monthly_spend: u32,
    pub estimated_waste: String,
    pub answers: WebhookAnswers,
}

impl From<&ContactSubmission> for WebhookPayload {
    fn from(submission: &ContactSubmission) -> Self {
        let answers = &submission.answers;
        Self {
            name: submission.name.clone(),
            email: submission.email.clone(),
            monthly_spend: answers.monthly_spend.dollars(),
            estimated_waste: submission.estimated_waste.clone(),
            answers: WebhookAnswers {
                smart_bidding: answers.uses_smart_bidding,
                performance_target: answers.beats_performance_target,
                brand_cpc: answers.brand_cpc_near_nonbrand,
                impression_share: answers.high_impression_share,
                match_type: answers.match_type_predominant,
            },
        }
    }
}

/// Durable store for submissions. Any failure must surface as an error.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn write(&self, collection: &str, record: &SubmissionRecord) -> Result<(), SinkError>;
}

/// Downstream notification. Only the response status is inspected.
#[async_trait]
pub trait WebhookSink: Send + Sync {
    async fn notify(&self, payload: &WebhookPayload) -> Result<(), SinkError>;
}

pub(crate) async fn status_error(response: reqwest::Response) -> SinkError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    SinkError::Status { status, body }
}
