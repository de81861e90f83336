//! Chat reply selection.
//!
//! A reply comes from the configured generation provider when there is one
//! and it answers. Any provider failure falls through to a localized reply
//! built around a random quote, and that path cannot fail either.

pub mod language;
pub mod types;
pub mod validation;

pub use language::{Language, LanguageInfo, LanguageProfile, languages};
pub use types::{ChatRequest, ChatResponse, ChatRole, ChatTurn, TextDirection};
pub use validation::validate;

use std::sync::Arc;

use crate::llm::{GenerationProvider, GenerationRequest, ProviderError};
use crate::quotes::QuoteStore;

/// Provider name reported for fallback replies.
pub const FALLBACK_PROVIDER: &str = "fallback";
/// Quotes embedded in the provider system instruction.
const CONTEXT_QUOTES: usize = 3;
/// Last-resort reply when no localized preamble is available.
const GENERIC_APOLOGY: &str = "Sorry, I can't answer right now. Please try again later.";

/// Decides how each chat message gets answered.
pub struct ResponseSelector {
    store: Arc<QuoteStore>,
    provider: Option<Arc<dyn GenerationProvider>>,
}

impl ResponseSelector {
    /// Create a selector. With `provider` set to `None` every reply is a
    /// fallback.
    #[must_use]
    pub fn new(store: Arc<QuoteStore>, provider: Option<Arc<dyn GenerationProvider>>) -> Self {
        Self { store, provider }
    }

    /// Name of the provider replies will come from when it succeeds.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider
            .as_ref()
            .map_or(FALLBACK_PROVIDER, |p| p.name())
    }

    /// Answer `message`. Never fails.
    pub async fn respond(
        &self,
        message: &str,
        language: Option<&str>,
        history: &[ChatTurn],
    ) -> ChatResponse {
        let language = Language::resolve(language);

        if let Some(provider) = &self.provider {
            match self.generate(provider.as_ref(), language, message, history).await {
                Ok(text) => {
                    let profile = language.profile();
                    return ChatResponse {
                        message: text,
                        language: profile.code.to_string(),
                        direction: profile.direction,
                        provider: provider.name().to_string(),
                        quote: None,
                        error: false,
                    };
                }
                Err(e) if e.is_timeout() => {
                    tracing::warn!("Generation via {} timed out, using fallback", provider.name());
                }
                Err(e) => {
                    tracing::warn!("Generation via {} failed, using fallback: {e}", provider.name());
                }
            }
        }

        self.fallback(language)
    }

    /// Build a reply around a random quote.
    ///
    /// With an empty store the reply is the preamble alone, in an `en`/`ltr`
    /// envelope, with `error` set.
    #[must_use]
    pub fn fallback(&self, language: Language) -> ChatResponse {
        let profile = language.profile();

        match self.store.random_one() {
            Ok(quote) => ChatResponse {
                message: format!(
                    "{}\n\n{}\n\n{}",
                    profile.fallback_preamble,
                    quote.attributed(),
                    profile.fallback_closing
                ),
                language: profile.code.to_string(),
                direction: profile.direction,
                provider: FALLBACK_PROVIDER.to_string(),
                quote: Some(quote.clone()),
                error: false,
            },
            Err(e) => {
                tracing::error!("Fallback reply has no quote: {e}");
                let message = if profile.fallback_preamble.is_empty() {
                    GENERIC_APOLOGY
                } else {
                    profile.fallback_preamble
                };
                ChatResponse {
                    message: message.to_string(),
                    language: Language::English.code().to_string(),
                    direction: TextDirection::Ltr,
                    provider: FALLBACK_PROVIDER.to_string(),
                    quote: None,
                    error: true,
                }
            }
        }
    }

    /// Localized instruction plus a few sample quotes for grounding.
    #[must_use]
    pub fn system_instruction(&self, language: Language) -> String {
        let samples: Vec<String> = self
            .store
            .sample(CONTEXT_QUOTES)
            .into_iter()
            .map(|q| q.attributed())
            .collect();

        if samples.is_empty() {
            return language.profile().system_prompt.to_string();
        }
        format!(
            "{}\n\nHere are some quotes from the collection:\n{}",
            language.profile().system_prompt,
            samples.join("\n")
        )
    }

    async fn generate(
        &self,
        provider: &dyn GenerationProvider,
        language: Language,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, ProviderError> {
        let request = GenerationRequest {
            system_instruction: self.system_instruction(language),
            history: history.to_vec(),
            message: message.to_string(),
        };

        let text = provider.generate(&request).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::EmptyReply);
        }
        Ok(trimmed.to_string())
    }
}
