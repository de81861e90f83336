//! Error types for the quote store.

use thiserror::Error;

/// Errors that can occur while loading or querying quotes.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The quote source or one of its entries has an unsupported shape.
    #[error("{0}")]
    Format(String),

    /// The store holds no quotes.
    #[error("no quotes available")]
    EmptyStore,

    /// No quote carries the requested id.
    #[error("Quote not found")]
    NotFound(String),

    /// The quote file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The quote file is not valid JSON.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuoteError {
    /// Top-level shape is neither an array nor `{ "quotes": [...] }`.
    #[must_use]
    pub fn invalid_file() -> Self {
        Self::Format("invalid quotes file format".to_string())
    }

    /// A single entry is neither a string nor a usable object.
    #[must_use]
    pub fn invalid_quote() -> Self {
        Self::Format("invalid quote format".to_string())
    }
}

/// Convenience result alias for quote operations.
pub type QuoteResult<T> = Result<T, QuoteError>;
