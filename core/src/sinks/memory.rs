use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use super::RecordStore;
use super::SinkError;
use super::SubmissionRecord;
use super::WebhookPayload;
use super::WebhookSink;

/// In-process record store that keeps every row it accepts. Used for dry
/// runs and tests; `set_failing(true)` makes subsequent writes fail.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    rows: Mutex<Vec<(String, SubmissionRecord)>>,
    failing: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<(String, SubmissionRecord)> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn write(&self, collection: &str, record: &SubmissionRecord) -> Result<(), SinkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::Unavailable("record store offline".to_string()));
        }
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| SinkError::Unavailable("record store poisoned".to_string()))?;
        rows.push((collection.to_string(), record.clone()));
        Ok(())
    }
}

/// In-process webhook that records each notification it receives.
#[derive(Debug, Default)]
pub struct MemoryWebhook {
    calls: Mutex<Vec<WebhookPayload>>,
    failing: AtomicBool,
}

impl MemoryWebhook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let sink = Self::default();
        sink.set_failing(true);
        sink
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<WebhookPayload> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl WebhookSink for MemoryWebhook {
    async fn notify(&self, payload: &WebhookPayload) -> Result<(), SinkError> {
        let mut calls = self
            .calls
            .lock()
            .map_err(|_| SinkError::Unavailable("webhook poisoned".to_string()))?;
        calls.push(payload.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::Status {
                status: 500,
                body: String::new(),
            });
        }
        Ok(())
    }
}
