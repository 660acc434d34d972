use pallet_protocol::PredictResponse;
use serde_json::json;

use crate::{Agent, AgentError, Prompt, RetryPolicy};

/// Agent served over HTTP by a `/predict` endpoint
pub struct RemoteAgent {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    secret_key: Option<String>,
    retry: RetryPolicy,
}

impl RemoteAgent {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: None,
            secret_key: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Sent as `Authorization: Bearer <key>`
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sent as `X-Secret-Key`
    pub fn with_secret_key(mut self, key: impl Into<String>) -> Self {
        self.secret_key = Some(key.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn request(&self, prompt: &Prompt) -> Result<Option<String>, AgentError> {
        let mut request = self
            .client
            .post(&self.api_url)
            .json(&json!({ "prompt": prompt.text }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        if let Some(secret) = &self.secret_key {
            request = request.header("X-Secret-Key", secret);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        interpret_body(&body)
    }
}

impl Agent for RemoteAgent {
    async fn respond(&self, prompt: &Prompt) -> Result<Option<String>, AgentError> {
        self.retry
            .run(&self.api_url, || self.request(prompt))
            .await
    }
}

/// Extract the action text from a `/predict` response body
fn interpret_body(body: &str) -> Result<Option<String>, AgentError> {
    let response: PredictResponse =
        serde_json::from_str(body).map_err(|e| AgentError::Decode(e.to_string()))?;

    match response {
        PredictResponse::Error { error } => Err(AgentError::Remote(error)),
        PredictResponse::Action { action } => Ok(action
            .map(|text| text.trim().to_lowercase())
            .filter(|text| !text.is_empty())),
    }
}
