//! OpenAI-compatible chat completion provider (`/chat/completions`).
//!
//! Works against OpenAI itself and any server exposing the same wire format.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error::ProviderError;
use super::{GenerationProvider, GenerationRequest, http_client};
use crate::chat::types::ChatRole;
use crate::config::ProviderSettings;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

const fn openai_role(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
    }
}

fn build_body<'a>(model: &'a str, request: &'a GenerationRequest) -> ChatCompletionRequest<'a> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(Message {
        role: "system",
        content: &request.system_instruction,
    });
    messages.extend(request.history.iter().map(|turn| Message {
        role: openai_role(turn.role),
        content: &turn.content,
    }));
    messages.push(Message {
        role: "user",
        content: &request.message,
    });

    ChatCompletionRequest { model, messages }
}

fn extract_text(response: ChatCompletionResponse) -> Result<String, ProviderError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Malformed("no choices".to_string()))?;

    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ProviderError::EmptyReply),
    }
}

/// Adapter for any HTTP endpoint implementing `/chat/completions`.
pub struct OpenAiProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiProvider {
    /// Create a provider from its settings.
    ///
    /// # Errors
    /// Returns an error if the settings carry no API key or the HTTP client
    /// cannot be built.
    pub fn new(settings: &ProviderSettings, timeout: Duration) -> Result<Self, ProviderError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::HttpClient("missing OpenAI API key".to_string()))?;

        Ok(Self {
            client: http_client(timeout)?,
            endpoint: format!("{}/chat/completions", settings.base_url),
            model: settings.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        tracing::debug!(
            "OpenAI request: model {}, {} history turns",
            self.model,
            request.history.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&build_body(&self.model, request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::status(status.as_u16(), &body));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        extract_text(parsed)
    }
}
