//! Assistant - chat backend integration with fixed fallbacks
//!
//! The assistant turns one operator prompt into an [`AssistantResponse`].
//! Backend failures never escape: they become fixed notices, and only a
//! successful reply reaches the interpreter.

use opsdeck_guard::interpret_reply;
use opsdeck_llm::{CompletionRequest, LLMError, LLMRouter, ProviderKind};
use opsdeck_state::{AssistantResponse, SessionEvent, StoreError, StoreHandle, Update};
use opsdeck_types::ChatTurn;

use crate::prompt::*;

/// The dashboard's chat assistant
#[derive(Debug, Clone)]
pub struct Assistant {
    llm: LLMRouter,
}

impl Assistant {
    /// Create an assistant backed by `llm`
    pub fn with_llm(llm: LLMRouter) -> Self {
        Self { llm }
    }

    /// Create from environment
    pub fn from_env() -> Self {
        Self::with_llm(LLMRouter::from_env())
    }

    /// Assistant that answers every prompt with the not-configured notice
    pub fn disabled() -> Self {
        Self::with_llm(LLMRouter::disabled())
    }

    /// Get which provider is being used
    pub fn provider_kind(&self) -> ProviderKind {
        self.llm.kind()
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_configured()
    }

    pub(crate) fn llm(&self) -> &LLMRouter {
        &self.llm
    }

    /// Ask the backend about `prompt`, given the transcript before it
    pub async fn respond(&self, history: &[ChatTurn], prompt: &str) -> AssistantResponse {
        if !self.llm.is_configured() {
            return AssistantResponse::Notice(NOT_CONFIGURED_REPLY.to_string());
        }

        let request = CompletionRequest::new(chat_messages(history, prompt)).with_system(SYSTEM_INSTRUCTION);
        tracing::debug!(turns = request.messages.len(), "sending chat request");

        match self.llm.complete(request).await {
            Ok(response) => {
                tracing::debug!(model = ?response.model, "chat reply received");
                AssistantResponse::Reply(interpret_reply(&response.content))
            }
            Err(LLMError::ProviderNotConfigured { .. }) => {
                AssistantResponse::Notice(NOT_CONFIGURED_REPLY.to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                AssistantResponse::Notice(BACKEND_ERROR_REPLY.to_string())
            }
        }
    }

    /// Run one full prompt/reply exchange through the store
    ///
    /// The prompt is queued first; if the store rejects it (blank, or a
    /// request already in flight) no backend call is made and the rejection
    /// events are returned as is.
    pub async fn converse(&self, store: &StoreHandle, prompt: &str) -> Result<Vec<SessionEvent>, StoreError> {
        let mut events = store.apply(Update::PromptSubmitted(prompt.to_string())).await?;

        let accepted = events.iter().find_map(|event| match event {
            SessionEvent::PromptAccepted { prompt, history } => Some((prompt.clone(), history.clone())),
            _ => None,
        });
        let Some((prompt, history)) = accepted else {
            return Ok(events);
        };

        let response = self.respond(&history, &prompt).await;
        events.extend(store.apply(Update::reply(response)).await?);
        Ok(events)
    }
}
