//! Inference gateway errors.
//!
//! Unlike tool failures, every gateway error is fatal to the session: it is
//! propagated to the caller and never retried. [`GatewayError::is_retryable`]
//! is for library callers that embed a gateway and want their own retry
//! policy.

use thiserror::Error;

/// Errors raised while exchanging a transcript with the remote model.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No API key was configured.
    #[error("missing API key: set ANTHROPIC_API_KEY or pass --api-key")]
    MissingApiKey,

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response. `retryable` is set for
    /// connection failures and surfaces through [`GatewayError::is_retryable`].
    #[error("transport error: {message}")]
    Transport { message: String, retryable: bool },

    /// The configured request timeout elapsed.
    #[error("request timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The response body could not be understood.
    #[error("unexpected response format: {message}")]
    ResponseFormat { message: String },

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Whether a library caller could reasonably retry. The session loop
    /// never consults this; it aborts on every gateway error.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport { retryable, .. } => *retryable,
            GatewayError::Timeout { .. } => true,
            GatewayError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Stable code suitable for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::MissingApiKey => "MISSING_API_KEY",
            GatewayError::Http { .. } => "HTTP_ERROR",
            GatewayError::Transport { .. } => "TRANSPORT_ERROR",
            GatewayError::Timeout { .. } => "TIMEOUT",
            GatewayError::ResponseFormat { .. } => "RESPONSE_FORMAT",
            GatewayError::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
