use thiserror::Error;

use sketch_llm::CompletionOutcome;
use sketch_rules::RuleError;
use sketch_spec::{FieldViolation, ValidationError};

/// Top-level error type for one generation request.
///
/// Empty and unparseable backend responses are distinct so operators can
/// tell a backend outage from backend misbehavior.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid generation request with {} violation(s)", violations.len())]
    InvalidRequest { violations: Vec<FieldViolation> },
    #[error("generation backend {outcome} after {retry_count} retries: {reason}")]
    Upstream {
        outcome: CompletionOutcome,
        retry_count: u32,
        reason: String,
    },
    #[error("backend returned an empty response")]
    EmptyResponse,
    #[error("backend response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error(transparent)]
    InvalidSpec(#[from] ValidationError),
    #[error(transparent)]
    Rules(#[from] RuleError),
}
