//! Remote text-generation providers.
//!
//! A provider takes a system instruction, the prior conversation and a new
//! message, and makes exactly one HTTP round trip. Failures are returned as
//! [`ProviderError`] and never retried here.

pub mod error;
pub mod gemini;
pub mod openai;

pub use error::ProviderError;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::chat::types::ChatTurn;
use crate::config::{LlmConfig, ProviderKind};

/// Everything a provider needs for one generation.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    /// Instruction placed before the conversation.
    pub system_instruction: String,
    /// Prior turns, oldest first.
    pub history: Vec<ChatTurn>,
    /// The new user message.
    pub message: String,
}

/// A remote service that turns a conversation into reply text.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Short name reported to clients (e.g. `"gemini"`).
    fn name(&self) -> &str;

    /// Generate a reply.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, or a
    /// response without text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}

/// Build the configured provider.
///
/// Returns `None` when generation is disabled, when the selected provider has
/// no API key, or when its HTTP client cannot be built. Chat then runs in
/// fallback-only mode.
#[must_use]
pub fn build_provider(config: &LlmConfig) -> Option<Arc<dyn GenerationProvider>> {
    let Some(settings) = config.active() else {
        tracing::info!(
            "No generation provider configured ({:?}), chat will use fallback replies",
            config.provider
        );
        return None;
    };

    let built: Result<Arc<dyn GenerationProvider>, ProviderError> = match config.provider {
        ProviderKind::Gemini => {
            GeminiProvider::new(settings, config.timeout)
                .map(|p| Arc::new(p) as Arc<dyn GenerationProvider>)
        }
        ProviderKind::OpenAi => {
            OpenAiProvider::new(settings, config.timeout)
                .map(|p| Arc::new(p) as Arc<dyn GenerationProvider>)
        }
        ProviderKind::Disabled => return None,
    };

    match built {
        Ok(provider) => {
            tracing::info!(
                "Generation provider: {} (model {})",
                provider.name(),
                settings.model
            );
            Some(provider)
        }
        Err(e) => {
            tracing::warn!("Failed to build generation provider: {e}");
            None
        }
    }
}

/// Upper bound on connection setup.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Reqwest client shared by the HTTP providers.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(CONNECT_TIMEOUT))
        .build()
        .map_err(|e| ProviderError::HttpClient(e.to_string()))
}
