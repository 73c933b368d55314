//! Session-level errors.
//!
//! Tool failures never show up here: they are fed back to the model as
//! results. Everything in [`SessionError`] ends the session.

use skiff_core::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The inference gateway failed. Never retried.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Reading the next human line failed.
    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),

    /// Writing to the terminal failed.
    #[error("failed to write output: {0}")]
    Output(std::io::Error),
}

impl SessionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SessionError::Gateway(e) => e.error_code(),
            SessionError::Input(_) => "INPUT_ERROR",
            SessionError::Output(_) => "OUTPUT_ERROR",
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
