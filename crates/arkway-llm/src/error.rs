use thiserror::Error;

/// Errors that can occur while calling the Responses API
#[derive(Debug, Error)]
pub enum LlmError {
    /// Model identifier or adapter setup is unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection, TLS or body transfer failure
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Vendor answered with a non-success status
    #[error("upstream error ({status}): {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Error message, or the raw body when it has no error envelope
        body: String,
    },

    /// Error during streaming response
    #[error("streaming error: {0}")]
    Streaming(String),

    /// Response body is not a response object
    #[error("decode error: {0}")]
    Decode(String),
}

impl LlmError {
    /// Whether retrying the same request may succeed
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Streaming(_) => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            Self::Configuration(_) | Self::Decode(_) => false,
        }
    }
}
