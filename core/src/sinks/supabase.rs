use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use tracing::debug;
use url::Url;

use super::RecordStore;
use super::SinkError;
use super::SubmissionRecord;
use super::status_error;

/// Inserts rows through the Supabase REST (PostgREST) endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseRecordStore {
    client: Client,
    base_url: Url,
    anon_key: String,
}

impl SupabaseRecordStore {
    pub fn new(base_url: Url, anon_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, anon_key)
    }

    pub fn with_client(client: Client, base_url: Url, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url,
            anon_key: anon_key.into(),
        }
    }

    fn table_url(&self, collection: &str) -> String {
        format!(
            "{}/rest/v1/{collection}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl RecordStore for SupabaseRecordStore {
    async fn write(&self, collection: &str, record: &SubmissionRecord) -> Result<(), SinkError> {
        let url = self.table_url(collection);
        debug!(%url, "inserting submission record");
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.anon_key))
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }
}
