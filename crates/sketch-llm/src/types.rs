use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    Assistant,
    User,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// One chat-style completion request.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Omitted from the outbound body when `None`; see
    /// [`supports_temperature`].
    pub temperature: Option<f64>,
    /// Ask the backend for a JSON-object-only response.
    pub json_object: bool,
}

/// A successful completion, plus whatever request id the backend assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    /// From the `x-request-id` header or the body `id` field; absence is
    /// not an error.
    pub backend_request_id: Option<String>,
}

/// Some models reject custom temperature outright; callers keep an exclusion
/// list and skip the field for those.
pub fn supports_temperature(model: &str, exclusions: &[String]) -> bool {
    !exclusions
        .iter()
        .any(|excluded| model.eq_ignore_ascii_case(excluded))
}
