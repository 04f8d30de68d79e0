//! Two-step delivery of a submission: record store first, webhook second.
//!
//! The webhook only runs after the record write succeeds. A webhook failure
//! leaves the stored row in place; nothing is rolled back or queued.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::contact::ContactSubmission;
use crate::sinks::RecordStore;
use crate::sinks::SUBMISSIONS_COLLECTION;
use crate::sinks::SinkError;
use crate::sinks::SubmissionRecord;
use crate::sinks::WebhookPayload;
use crate::sinks::WebhookSink;

#[derive(Debug)]
pub enum StepOutcome {
    Succeeded,
    Failed(SinkError),
    Skipped,
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded)
    }
}

/// Tagged result for each step of one attempt.
#[derive(Debug)]
pub struct SubmissionReport {
    pub record: StepOutcome,
    pub webhook: StepOutcome,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("record store write failed: {0}")]
    RecordStore(SinkError),
    #[error("webhook notification failed after the record was stored: {0}")]
    Webhook(SinkError),
}

impl SubmissionReport {
    pub fn is_success(&self) -> bool {
        self.record.is_success() && self.webhook.is_success()
    }

    pub fn into_result(self) -> Result<(), SubmitError> {
        match (self.record, self.webhook) {
            (StepOutcome::Failed(err), _) => Err(SubmitError::RecordStore(err)),
            (_, StepOutcome::Failed(err)) => Err(SubmitError::Webhook(err)),
            (StepOutcome::Succeeded, StepOutcome::Succeeded) => Ok(()),
            (record, webhook) => Err(SubmitError::RecordStore(SinkError::Unavailable(format!(
                "incomplete submission: record={record:?} webhook={webhook:?}"
            )))),
        }
    }
}

#[derive(Clone)]
pub struct SubmissionPipeline {
    store: Arc<dyn RecordStore>,
    webhook: Arc<dyn WebhookSink>,
    collection: String,
}

impl SubmissionPipeline {
    pub fn new(store: Arc<dyn RecordStore>, webhook: Arc<dyn WebhookSink>) -> Self {
        Self {
            store,
            webhook,
            collection: SUBMISSIONS_COLLECTION.to_string(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub async fn execute(&self, submission: &ContactSubmission) -> SubmissionReport {
        let record = SubmissionRecord::from(submission);
        if let Err(err) = self.store.write(&self.collection, &record).await {
            warn!(error = %err, collection = %self.collection, "record store write failed");
            return SubmissionReport {
                record: StepOutcome::Failed(err),
                webhook: StepOutcome::Skipped,
            };
        }

        let payload = WebhookPayload::from(submission);
        let webhook = match self.webhook.notify(&payload).await {
            Ok(()) => StepOutcome::Succeeded,
            Err(err) => {
                warn!(
                    error = %err,
                    "webhook failed after the record was stored; the row is kept"
                );
                StepOutcome::Failed(err)
            }
        };
        SubmissionReport {
            record: StepOutcome::Succeeded,
            webhook,
        }
    }
}

impl fmt::Debug for SubmissionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionPipeline")
            .field("collection", &self.collection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactDetails;
    use crate::questionnaire::QuestionnaireInput;
    use crate::sinks::MemoryRecordStore;
    use crate::sinks::MemoryWebhook;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn submission() -> ContactSubmission {
        ContactSubmission::new(
            &ContactDetails::new("Ada", "ada@example.com"),
            QuestionnaireInput::default(),
            "$5,751.15",
        )
    }

    #[tokio::test]
    async fn both_steps_run_in_order() {
        let store = Arc::new(MemoryRecordStore::new());
        let webhook = Arc::new(MemoryWebhook::new());
        let pipeline = SubmissionPipeline::new(store.clone(), webhook.clone());

        let report = pipeline.execute(&submission()).await;
        assert!(report.is_success());
        assert_eq!(store.len(), 1);
        assert_eq!(store.rows()[0].0, "submissions");
        assert_eq!(webhook.call_count(), 1);
        assert!(report.into_result().is_ok());
    }

    #[tokio::test]
    async fn webhook_skipped_when_record_write_fails() {
        let store = Arc::new(MemoryRecordStore::failing());
        let webhook = Arc::new(MemoryWebhook::new());
        let pipeline = SubmissionPipeline::new(store.clone(), webhook.clone());

        let report = pipeline.execute(&submission()).await;
        assert_matches!(report.record, StepOutcome::Failed(_));
        assert_matches!(report.webhook, StepOutcome::Skipped);
        assert_eq!(webhook.call_count(), 0);
        assert_matches!(report.into_result(), Err(SubmitError::RecordStore(_)));
    }

    #[tokio::test]
    async fn webhook_failure_keeps_stored_row() {
        let store = Arc::new(MemoryRecordStore::new());
        let webhook = Arc::new(MemoryWebhook::failing());
        let pipeline = SubmissionPipeline::new(store.clone(), webhook.clone());

        let report = pipeline.execute(&submission()).await;
        assert!(report.record.is_success());
        assert_matches!(report.webhook, StepOutcome::Failed(_));
        assert_eq!(store.len(), 1);
        assert_matches!(report.into_result(), Err(SubmitError::Webhook(_)));
    }

    #[tokio::test]
    async fn custom_collection_is_used() {
        let store = Arc::new(MemoryRecordStore::new());
        let pipeline = SubmissionPipeline::new(store.clone(), Arc::new(MemoryWebhook::new()))
            .with_collection("staging_submissions");
        pipeline.execute(&submission()).await;
        assert_eq!(store.rows()[0].0, "staging_submissions");
    }
}
