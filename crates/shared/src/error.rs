use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNKNOWN_BACKEND_ERROR: &str = "unknown backend error";

/// Failure body every detector endpoint may return: `{success: false, error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }

    /// The server-supplied message, or a generic one when the backend sent none.
    pub fn message(&self) -> &str {
        if self.error.trim().is_empty() {
            UNKNOWN_BACKEND_ERROR
        } else {
            &self.error
        }
    }
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed backend response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("backend response is missing the `success` flag")]
    MissingSuccessFlag,
}
