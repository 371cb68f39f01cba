//! LLM Router - Holds the configured provider, if any

use std::sync::Arc;

use crate::providers::*;
use crate::types::*;

/// The LLM Router owns the provider selected from configuration
///
/// A router without a provider is a valid, degraded state: every call
/// returns [`LLMError::ProviderNotConfigured`] without touching the network.
#[derive(Clone)]
pub struct LLMRouter {
    provider: Option<Arc<dyn LLMProvider>>,
}

impl LLMRouter {
    /// Create a router with a specific provider
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Create a router with no provider
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    /// Create a router from environment variables
    ///
    /// Loads `.env` if present, then builds a Gemini provider when a
    /// credential is configured (see [`GeminiConfig::from_env`]).
    pub fn from_env() -> Self {
        // Try to load .env file (ignore errors)
        let _ = dotenvy::dotenv();

        match GeminiProvider::from_env() {
            Some(provider) => {
                tracing::info!(model = provider.model(), "Gemini provider configured");
                Self::new(Arc::new(provider))
            }
            None => {
                tracing::warn!("API key is not set, AI features will not work");
                Self::disabled()
            }
        }
    }

    /// Get the provider kind
    pub fn kind(&self) -> ProviderKind {
        self.provider
            .as_ref()
            .map(|p| p.kind())
            .unwrap_or(ProviderKind::Disabled)
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Complete a request using the configured provider
    pub async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        match &self.provider {
            Some(provider) => provider.complete(request).await,
            None => Err(LLMError::ProviderNotConfigured {
                provider: "gemini".to_string(),
            }),
        }
    }
}

impl Default for LLMRouter {
    fn default() -> Self {
        Self::from_env()
    }
}

impl std::fmt::Debug for LLMRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMRouter")
            .field("kind", &self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoProvider;

    #[async_trait]
    impl LLMProvider for EchoProvider {
        fn name(&self) -> &'static str {
            "Echo"
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::Custom
        }

        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            let last = request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(CompletionResponse::new(last))
        }
    }

    #[tokio::test]
    async fn test_disabled_router_refuses() {
        let router = LLMRouter::disabled();
        assert!(!router.is_configured());
        assert_eq!(router.kind(), ProviderKind::Disabled);

        let result = router.complete(CompletionRequest::prompt("Hello")).await;
        assert!(matches!(result, Err(LLMError::ProviderNotConfigured { .. })));
    }

    #[tokio::test]
    async fn test_router_delegates_to_provider() {
        let router = LLMRouter::new(Arc::new(EchoProvider));
        assert!(router.is_configured());
        assert_eq!(router.kind(), ProviderKind::Custom);

        let response = router
            .complete(CompletionRequest::prompt("ping"))
            .await
            .unwrap();
        assert_eq!(response.content, "ping");
    }

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ProviderKind::Gemini.to_string(), "gemini");
        assert_eq!(ProviderKind::Disabled.to_string(), "disabled");
    }
}
