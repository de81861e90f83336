//! Google Gemini `generateContent` provider.
//!
//! Assistant turns are sent with Gemini's `model` role; the system instruction
//! travels in the dedicated `systemInstruction` field.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error::ProviderError;
use super::{GenerationProvider, GenerationRequest, http_client};
use crate::chat::types::ChatRole;
use crate::config::ProviderSettings;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini role for a conversation turn.
const fn gemini_role(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "model",
    }
}

fn build_body(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    let mut contents: Vec<Content<'_>> = request
        .history
        .iter()
        .map(|turn| Content {
            role: Some(gemini_role(turn.role)),
            parts: vec![Part {
                text: &turn.content,
            }],
        })
        .collect();
    contents.push(Content {
        role: Some(gemini_role(ChatRole::User)),
        parts: vec![Part {
            text: &request.message,
        }],
    });

    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: &request.system_instruction,
            }],
        },
        contents,
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Malformed("no candidates".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyReply);
    }
    Ok(text)
}

/// Client for the Gemini REST API.
pub struct GeminiProvider {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiProvider {
    /// Create a provider from its settings.
    ///
    /// # Errors
    /// Returns an error if the settings carry no API key or the HTTP client
    /// cannot be built.
    pub fn new(settings: &ProviderSettings, timeout: Duration) -> Result<Self, ProviderError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::HttpClient("missing Gemini API key".to_string()))?;

        Ok(Self {
            client: http_client(timeout)?,
            endpoint: format!(
                "{}/models/{}:generateContent",
                settings.base_url, settings.model
            ),
            api_key,
        })
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        tracing::debug!(
            "Gemini request: {} history turns, message {} chars",
            request.history.len(),
            request.message.chars().count()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&build_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::status(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::types::ChatTurn;
    use serde_json::json;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_instruction: "Be kind".to_string(),
            history: vec![ChatTurn::user("hello"), ChatTurn::assistant("hi there")],
            message: "tell me a quote".to_string(),
        }
    }

    #[test]
    fn test_body_maps_assistant_to_model() {
        let req = request();
        let body = serde_json::to_value(build_body(&req)).unwrap_or_default();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be kind");
        assert!(body["systemInstruction"].get("role").is_none());

        let contents = body["contents"].as_array().cloned().unwrap_or_default();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "hi there");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "tell me a quote");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "Hello "}, {"text": "world"}]}}]
        }))
        .unwrap_or(GenerateContentResponse { candidates: vec![] });

        assert_eq!(extract_text(response).ok().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_extract_text_errors() {
        let empty = GenerateContentResponse { candidates: vec![] };
        assert!(matches!(extract_text(empty), Err(ProviderError::Malformed(_))));

        let blank: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "  "}]}}]
        }))
        .unwrap_or(GenerateContentResponse { candidates: vec![] });
        assert!(matches!(extract_text(blank), Err(ProviderError::EmptyReply)));
    }

    #[test]
    fn test_endpoint_uses_model() {
        let settings = ProviderSettings {
            api_key: Some("k".to_string()),
            model: "gemini-pro".to_string(),
            base_url: "https://example.test/v1beta".to_string(),
        };
        let provider = GeminiProvider::new(&settings, Duration::from_secs(5));
        assert_eq!(
            provider.map(|p| p.endpoint).ok().as_deref(),
            Some("https://example.test/v1beta/models/gemini-pro:generateContent")
        );
    }
}
