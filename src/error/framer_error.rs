//! The unified framer error type.

use thiserror::Error;

use crate::traits::HttpError;

/// Errors returned synchronously by framer and client operations.
#[derive(Debug, Clone, Error)]
pub enum FramerError {
    /// A live session already owns this trace id. The new stream was not
    /// read and the existing session is untouched.
    #[error("Trace id '{trace_id}' already has an active stream")]
    AlreadyActive { trace_id: String },

    /// `start` was called outside a Tokio runtime.
    #[error("No Tokio runtime available to drive the stream")]
    NoRuntime,

    /// Opening the HTTP stream failed.
    #[error("Failed to open stream: {0}")]
    Http(#[from] HttpError),

    /// The HTTP client could not be built from the configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FramerError {
    /// Whether retrying the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FramerError::AlreadyActive { .. } => true,
            FramerError::Http(err) => err.is_retryable(),
            FramerError::NoRuntime | FramerError::Config(_) => false,
        }
    }
}
