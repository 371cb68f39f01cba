//! Common types for LLM interactions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    #[error("Provider not configured: {provider}")]
    ProviderNotConfigured { provider: String },

    #[error("Request failed with HTTP {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// Role of a message in a conversation
///
/// Gemini only knows two conversational roles; system instructions travel
/// separately on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Model,
            content: content.into(),
        }
    }
}

/// Request to complete a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Prior turns followed by the new prompt
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            system: None,
            messages,
        }
    }

    /// Single user prompt with no history
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self::new(vec![Message::user(prompt)])
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Response from a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated content
    pub content: String,
    /// Which model was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl CompletionResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: None,
        }
    }
}

/// Provider kind, reported in logs and status output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Google Gemini API
    Gemini,
    /// Any in-process provider (tests, scripted sessions)
    Custom,
    /// No credential configured
    Disabled,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Custom => write!(f, "custom"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::prompt("Hello").with_system("be brief");

        assert_eq!(request.messages, vec![Message::user("Hello")]);
        assert_eq!(request.system.as_deref(), Some("be brief"));
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&MessageRole::Model).unwrap(), "\"model\"");
        assert_eq!(MessageRole::User.as_str(), "user");
    }
}
