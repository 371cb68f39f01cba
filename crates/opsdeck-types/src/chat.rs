//! Chat turns exchanged between the operator and the assistant

use serde::{Deserialize, Serialize};

/// Opening line of every assistant session
pub const ASSISTANT_GREETING: &str = "Hello! How can I help you manage the system today?";

/// Who produced a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// A single message in the assistant transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }
}
