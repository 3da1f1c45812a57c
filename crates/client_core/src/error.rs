use std::time::Duration;

use shared::error::EnvelopeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// `{success: false, error}` from the backend; displays the server text verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("request timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },
    #[error("failed to reach backend: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("backend returned HTTP {status}")]
    Status { status: u16 },
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
    /// The front end could not hand the request to its backend worker.
    #[error("backend worker unavailable: {0}")]
    Unavailable(String),
    #[error("invalid backend url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ClientError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Transport-level failures that a retry policy may re-attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport(_) => true,
            Self::Status { status } => *status >= 500,
            Self::Rejected(_)
            | Self::Envelope(_)
            | Self::Encode(_)
            | Self::Unavailable(_)
            | Self::InvalidUrl { .. } => false,
        }
    }
}
