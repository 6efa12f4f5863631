//! Retry, backoff, and timeout policy around one completion call.
//!
//! A timeout is a distinct outcome class and is never retried. Retryable
//! failures back off exponentially up to the configured budget. When the
//! budget runs out, the nature of the last observed error decides whether
//! the result reports as a timeout or a generic error.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::CompletionBackend;
use crate::types::{Completion, CompletionRequest};

#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            timeout_ms: 45_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionOutcome {
    Success,
    Timeout,
    Error,
}

impl std::fmt::Display for CompletionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CompletionOutcome::Success => "success",
            CompletionOutcome::Timeout => "timeout",
            CompletionOutcome::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RetryResult {
    pub outcome: CompletionOutcome,
    pub completion: Option<Completion>,
    pub retry_count: u32,
    pub backend_request_id: Option<String>,
    pub error: Option<String>,
}

/// Issue one completion request under the retry/timeout policy.
pub async fn request_completion(
    backend: &dyn CompletionBackend,
    request: &CompletionRequest,
    config: &RetryConfig,
) -> RetryResult {
    let timeout = Duration::from_millis(config.timeout_ms);
    let mut retry_count = 0u32;

    loop {
        let attempt = tokio::time::timeout(timeout, backend.complete(request.clone())).await;
        match attempt {
            Err(_elapsed) => {
                // An elapsed call timeout is terminal; retrying would only
                // stack another full timeout window on the caller.
                return RetryResult {
                    outcome: CompletionOutcome::Timeout,
                    completion: None,
                    retry_count,
                    backend_request_id: None,
                    error: Some(format!("call exceeded {}ms timeout", config.timeout_ms)),
                };
            }
            Ok(Ok(completion)) => {
                let backend_request_id = completion.backend_request_id.clone();
                return RetryResult {
                    outcome: CompletionOutcome::Success,
                    completion: Some(completion),
                    retry_count,
                    backend_request_id,
                    error: None,
                };
            }
            Ok(Err(error)) => {
                if error.is_retryable() && retry_count < config.max_retries {
                    let delay = config
                        .base_delay_ms
                        .saturating_mul(2u64.saturating_pow(retry_count));
                    retry_count += 1;
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    continue;
                }
                let outcome = if error.is_timeout_like() {
                    CompletionOutcome::Timeout
                } else {
                    CompletionOutcome::Error
                };
                return RetryResult {
                    outcome,
                    completion: None,
                    retry_count,
                    backend_request_id: None,
                    error: Some(error.to_string()),
                };
            }
        }
    }
}
