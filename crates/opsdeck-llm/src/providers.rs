//! LLM Provider implementations

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::*;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Trait for LLM providers
///
/// One call per completion: no retries, no streaming, no cancellation.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Get the provider kind
    fn kind(&self) -> ProviderKind;

    /// Complete a conversation
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

// ============================================================================
// Gemini Provider
// ============================================================================

/// Configuration for the Gemini provider
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_URL.to_string(),
        }
    }

    /// Reads `OPSDECK_API_KEY` (falling back to `API_KEY`), plus optional
    /// `OPSDECK_GEMINI_MODEL` and `OPSDECK_GEMINI_URL`.
    ///
    /// Returns `None` when no non-empty credential is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPSDECK_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())?;

        Some(Self {
            api_key,
            model: std::env::var("OPSDECK_GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: std::env::var("OPSDECK_GEMINI_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_URL.to_string()),
        })
    }
}

/// Google Gemini `generateContent` provider
pub struct GeminiProvider {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Option<Self> {
        Some(Self::new(GeminiConfig::from_env()?))
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiInstruction>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiErrorWrapper {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn build_request(request: &CompletionRequest) -> GeminiRequest {
    let contents = request
        .messages
        .iter()
        .map(|msg| GeminiContent {
            role: msg.role.as_str().to_string(),
            parts: vec![GeminiPart {
                text: msg.content.clone(),
            }],
        })
        .collect();

    GeminiRequest {
        contents,
        system_instruction: request.system.as_ref().map(|text| GeminiInstruction {
            parts: vec![GeminiPart { text: text.clone() }],
        }),
    }
}

/// Text of the first candidate, all text parts concatenated
fn extract_text(response: GeminiResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LLMError::InvalidResponse {
            message: "Gemini returned no text in the response candidates".to_string(),
        });
    }
    Ok(text)
}

fn describe_http_error(body: &str) -> String {
    serde_json::from_str::<GeminiErrorWrapper>(body)
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status) if !status.is_empty() => format!("{}: {}", status, msg),
                _ => msg,
            }
        })
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = &self.config.model;
        let body = build_request(&request);

        tracing::debug!(
            model = %model,
            turns = body.contents.len(),
            has_system = body.system_instruction.is_some(),
            "sending Gemini generateContent request"
        );

        let url = format!("{}/{}:generateContent", self.config.base_url, model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::RequestFailed {
                status: status.as_u16(),
                message: describe_http_error(&body),
            });
        }

        let gemini_response: GeminiResponse =
            response.json().await.map_err(|e| LLMError::InvalidResponse {
                message: e.to_string(),
            })?;

        Ok(CompletionResponse {
            content: extract_text(gemini_response)?,
            model: Some(model.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = CompletionRequest::new(vec![
            Message::model("Hello! How can I help?"),
            Message::user("Add a new operator named Alex."),
        ])
        .with_system("You are a system management AI assistant.");

        let json = serde_json::to_value(build_request(&request)).unwrap();

        assert_eq!(json["contents"][0]["role"], "model");
        assert_eq!(json["contents"][1]["role"], "user");
        assert_eq!(
            json["contents"][1]["parts"][0]["text"],
            "Add a new operator named Alex."
        );
        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "You are a system management AI assistant."
        );
    }

    #[test]
    fn test_request_without_system_instruction() {
        let request = CompletionRequest::prompt("Summarize");
        let json = serde_json::to_value(build_request(&request)).unwrap();

        assert!(json.get("systemInstruction").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
    }

    #[test]
    fn test_extract_text_joins_parts_of_first_candidate() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"action\": "}, {"text": "\"OPTIMIZE_MEMORY\"}"}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(body).unwrap();

        assert_eq!(
            extract_text(response).unwrap(),
            r#"{"action": "OPTIMIZE_MEMORY"}"#
        );
    }

    #[test]
    fn test_extract_text_rejects_empty_candidates() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            extract_text(response),
            Err(LLMError::InvalidResponse { .. })
        ));

        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text(response).is_err());
    }

    #[test]
    fn test_describe_http_error() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(
            describe_http_error(body),
            "INVALID_ARGUMENT: API key not valid."
        );
        assert_eq!(describe_http_error("upstream down"), "upstream down");
    }

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::new("key");
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.base_url, DEFAULT_GEMINI_URL);
    }
}
