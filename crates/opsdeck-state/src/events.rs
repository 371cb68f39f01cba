//! Session events produced by the reducer
//!
//! Every applied update returns the events it caused. The store also
//! broadcasts them to subscribers (the TUI status line, CLI output).

use opsdeck_types::{ChatTurn, User};
use serde::Serialize;

/// Why a prompt was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptRejection {
    /// A backend request is already in flight
    Busy,
    /// Prompt was empty after trimming
    Empty,
}

/// Session-wide events emitted while applying updates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// The operator's prompt joined the transcript; the assistant is busy
    PromptAccepted {
        prompt: String,
        /// Transcript as it was before the prompt
        history: Vec<ChatTurn>,
    },

    PromptRejected { reason: PromptRejection },

    /// A turn was appended to the transcript
    TurnAppended { turn: ChatTurn },

    /// A user record was created by a dispatched command
    UserAdded { user: User },

    /// A recognized command failed parameter validation
    CommandRejected { action: String, reason: String },

    /// An unrecognized command was dropped
    CommandIgnored { action: String },

    /// A simulator tick was applied
    Ticked {
        tick: u64,
        /// Task whose progress moved, if any
        advanced_task: Option<u32>,
    },
}

impl SessionEvent {
    /// Short line for status bars and logs
    pub fn summary(&self) -> String {
        match self {
            Self::PromptAccepted { prompt, .. } => format!("prompt sent: {}", prompt),
            Self::PromptRejected { reason } => match reason {
                PromptRejection::Busy => "assistant is busy, prompt ignored".to_string(),
                PromptRejection::Empty => "empty prompt ignored".to_string(),
            },
            Self::TurnAppended { turn } => format!("{:?}: {}", turn.speaker, turn.text),
            Self::UserAdded { user } => {
                format!("user #{} '{}' added as {}", user.id, user.name, user.role)
            }
            Self::CommandRejected { action, reason } => {
                format!("{} rejected: {}", action, reason)
            }
            Self::CommandIgnored { action } => format!("unknown action {} ignored", action),
            Self::Ticked { tick, .. } => format!("tick {}", tick),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = SessionEvent::CommandIgnored {
            action: "REBOOT".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "CommandIgnored");
        assert_eq!(json["action"], "REBOOT");
    }

    #[test]
    fn test_summary() {
        let event = SessionEvent::PromptRejected {
            reason: PromptRejection::Busy,
        };
        assert_eq!(event.summary(), "assistant is busy, prompt ignored");
    }
}
