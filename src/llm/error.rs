//! Error types for generation providers.

use thiserror::Error;

/// Maximum characters of an error body kept for logging.
const BODY_EXCERPT_CHARS: usize = 200;

/// Errors that can occur while calling a remote generation provider.
///
/// None of these reach the end user: the chat layer turns every variant into
/// a fallback reply.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (connect, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// The response did not have the expected structure.
    #[error("malformed provider response: {0}")]
    Malformed(String),

    /// The provider answered with no usable text.
    #[error("provider returned an empty reply")]
    EmptyReply,
}

impl ProviderError {
    /// Build a [`ProviderError::Status`], keeping only the start of `body`.
    #[must_use]
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body.chars().take(BODY_EXCERPT_CHARS).collect(),
        }
    }

    /// Check if the failure was a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::HttpRequest(e) if e.is_timeout())
    }
}
