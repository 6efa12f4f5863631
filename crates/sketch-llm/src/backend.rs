use async_trait::async_trait;
use serde_json::{Value, json};

use crate::errors::BackendError;
use crate::types::{Completion, CompletionRequest};

/// Seam between the pipeline and the generation backend.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, BackendError>;
}

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-style chat-completions adapter.
pub struct OpenAiBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build from `OPENAI_API_KEY` (and optional `OPENAI_BASE_URL`).
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let backend = Self::new(api_key);
        match std::env::var("OPENAI_BASE_URL") {
            Ok(base_url) if !base_url.trim().is_empty() => {
                Some(backend.with_base_url(base_url.trim().trim_end_matches('/')))
            }
            _ => Some(backend),
        }
    }

    fn body(request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": request.model,
            "messages": request.messages,
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        if request.json_object {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, BackendError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&Self::body(&request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let header_id = response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: truncate(&message, 500),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|error| BackendError::InvalidResponse(error.to_string()))?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let body_id = payload
            .get("id")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);

        Ok(Completion {
            content,
            backend_request_id: header_id.or(body_id),
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Network("request timed out".to_string())
    } else if error.is_connect() {
        BackendError::Network(format!("connection failed: {error}"))
    } else {
        BackendError::Network(error.to_string())
    }
}

fn truncate(input: &str, max_len: usize) -> String {
    input.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[test]
    fn body_includes_temperature_only_when_set() {
        let mut request = CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hi")],
            temperature: Some(0.4),
            json_object: true,
        };
        let body = OpenAiBackend::body(&request);
        assert_eq!(body["temperature"], 0.4);
        assert_eq!(body["response_format"]["type"], "json_object");

        request.temperature = None;
        request.json_object = false;
        let body = OpenAiBackend::body(&request);
        assert!(body.get("temperature").is_none());
        assert!(body.get("response_format").is_none());
    }
}
