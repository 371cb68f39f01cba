//! Command envelopes extracted from assistant replies
//!
//! A reply is either a JSON object carrying an `action` (and optionally
//! `params`), or anything else, which is shown to the operator verbatim.

use std::fmt;

use serde_json::{Map, Value};

/// The closed set of commands the assistant may propose
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandAction {
    AddUser,
    OptimizeMemory,
    ShowPerformance,
    /// Any other action name, kept verbatim so it can be reported and ignored
    Unrecognized(String),
}

impl CommandAction {
    /// Exact, case-sensitive match on the wire names
    pub fn from_name(name: &str) -> Self {
        match name {
            "ADD_USER" => Self::AddUser,
            "OPTIMIZE_MEMORY" => Self::OptimizeMemory,
            "SHOW_PERFORMANCE" => Self::ShowPerformance,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::AddUser => "ADD_USER",
            Self::OptimizeMemory => "OPTIMIZE_MEMORY",
            Self::ShowPerformance => "SHOW_PERFORMANCE",
            Self::Unrecognized(name) => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured command proposed by the model
///
/// Transient: built from one reply, consumed by the dispatcher, dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandEnvelope {
    pub action: CommandAction,
    /// Unvalidated parameters; empty when absent or not an object
    pub params: Map<String, Value>,
}

impl CommandEnvelope {
    pub fn new(action: CommandAction) -> Self {
        Self {
            action,
            params: Map::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// String parameter, `None` when absent or not a string
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

/// The outcome of interpreting one backend reply
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantReply {
    Command(CommandEnvelope),
    PlainText(String),
}

/// Strict parse of a reply into a command envelope
///
/// The reply must be a JSON object whose `action` is a non-empty string.
/// Every other input, malformed JSON included, is returned unmodified as
/// plain text. This is the designed fallback, not an error.
pub fn interpret_reply(reply: &str) -> AssistantReply {
    let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(reply) else {
        return AssistantReply::PlainText(reply.to_string());
    };

    let action = match object.get("action") {
        Some(Value::String(name)) if !name.trim().is_empty() => CommandAction::from_name(name.trim()),
        _ => return AssistantReply::PlainText(reply.to_string()),
    };

    let params = match object.remove("params") {
        Some(Value::Object(params)) => params,
        _ => Map::new(),
    };

    AssistantReply::Command(CommandEnvelope { action, params })
}
