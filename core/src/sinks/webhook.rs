use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use tracing::debug;
use url::Url;

use super::SinkError;
use super::WebhookPayload;
use super::WebhookSink;
use super::status_error;

/// Posts the submission as JSON to an automation webhook with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpWebhookSink {
    client: Client,
    url: Url,
    token: String,
}

impl HttpWebhookSink {
    pub fn new(url: Url, token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url, token)
    }

    pub fn with_client(client: Client, url: Url, token: impl Into<String>) -> Self {
        Self {
            client,
            url,
            token: token.into(),
        }
    }
}

#[async_trait]
impl WebhookSink for HttpWebhookSink {
    async fn notify(&self, payload: &WebhookPayload) -> Result<(), SinkError> {
        debug!(url = %self.url, "notifying webhook");
        // `.json` sets `Content-Type: application/json`.
        let response = self
            .client
            .post(self.url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::Answer;
    use crate::questionnaire::MatchType;
    use crate::sinks::WebhookAnswers;
    use assert_matches::assert_matches;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;
    use wiremock::matchers::body_partial_json;
    use wiremock::matchers::header;
    use wiremock::matchers::method;
    use wiremock::matchers::path;

    fn payload() -> WebhookPayload {
        WebhookPayload {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            monthly_spend: 10_000,
            estimated_waste: "$1,917.05".to_string(),
            answers: WebhookAnswers {
                smart_bidding: Answer::No,
                performance_target: Answer::Unanswered,
                brand_cpc: Answer::No,
                impression_share: Answer::No,
                match_type: MatchType::ExactOrPhrase,
            },
        }
    }

    fn sink(server: &MockServer) -> HttpWebhookSink {
        let url = Url::parse(&format!("{}/functions/v1/zapier-webhook", server.uri()))
            .expect("mock url");
        HttpWebhookSink::new(url, "secret")
    }

    #[tokio::test]
    async fn sends_bearer_token_and_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/zapier-webhook"))
            .and(header("authorization", "Bearer secret"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "monthlySpend": 10000,
                "answers": { "matchType": "no", "performanceTarget": "" },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("ignored"))
            .expect(1)
            .mount(&server)
            .await;

        sink(&server).notify(&payload()).await.expect("notify");
        server.verify().await;
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = sink(&server)
            .notify(&payload())
            .await
            .expect_err("502 is a failure");
        assert_matches!(err, SinkError::Status { status: 502, .. });
    }
}
