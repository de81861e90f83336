//! Wire types for the chat endpoint.

use serde::{Deserialize, Serialize};

use crate::quotes::Quote;

/// Who authored a conversation turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The end user.
    User,
    /// A previous reply from this service.
    Assistant,
}

/// One prior turn supplied by the caller.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Author of the turn.
    pub role: ChatRole,
    /// Turn text.
    pub content: String,
}

impl ChatTurn {
    /// A user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// An assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A chat request that has already passed validation.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatRequest {
    /// The new user message.
    pub message: String,
    /// Requested reply language code.
    #[serde(default)]
    pub language: Option<String>,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub history: Option<Vec<ChatTurn>>,
}

/// Text direction of a language.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

/// Reply returned by the chat endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Reply text.
    pub message: String,
    /// Resolved language code.
    pub language: String,
    /// Direction the client should render `message` in.
    pub direction: TextDirection,
    /// Provider name, or `"fallback"`.
    pub provider: String,
    /// Quote drawn for a fallback reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
    /// Set only when even the fallback could not draw a quote.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}
