use thiserror::Error;

/// Status codes worth another attempt: rate limiting and transient
/// server-side failures.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

const TIMEOUT_MARKERS: [&str; 3] = ["timed out", "timeout", "connection reset"];

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Http { status, .. } => RETRYABLE_STATUSES.contains(status),
            BackendError::Network(_) => self.is_timeout_like(),
            BackendError::InvalidResponse(_) => false,
        }
    }

    /// Network failures that read as a timeout or connection reset. When one
    /// of these is the last error before retries run out, the exhausted
    /// outcome reports as a timeout rather than a generic error.
    pub fn is_timeout_like(&self) -> bool {
        match self {
            BackendError::Network(message) => {
                let message = message.to_lowercase();
                TIMEOUT_MARKERS.iter().any(|marker| message.contains(marker))
            }
            _ => false,
        }
    }
}
