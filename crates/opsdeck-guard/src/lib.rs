//! OpsDeck Guard - Assistant Reply Interpreter and Command Validator
//!
//! This crate decides what a backend reply *is* before anything acts on it.
//!
//! # Key Principle
//!
//! **The model may PROPOSE commands, it NEVER EXECUTES them.**
//!
//! Replies are interpreted once, into [`AssistantReply::Command`] or
//! [`AssistantReply::PlainText`]. Command parameters are untrusted and must
//! pass validation here before the dispatcher mutates any state:
//! - `name` must be present, non-blank, printable and bounded in length
//! - `role` must be one of Admin, Operator, Viewer

pub mod envelope;

pub use envelope::*;

use opsdeck_types::UserRole;
use thiserror::Error;

/// Errors that can occur during validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("missing required parameter '{field}'")]
    MissingField { field: String },

    #[error("invalid parameter '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("action {action} does not take validated parameters")]
    UnsupportedAction { action: String },
}

pub type Result<T> = std::result::Result<T, GuardError>;

/// Configuration for the guard
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Longest accepted user name, in characters
    pub max_name_chars: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self { max_name_chars: 64 }
    }
}

/// Validated parameters of an `ADD_USER` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddUserParams {
    pub name: String,
    pub role: UserRole,
}

/// The OpsDeck Guard
///
/// Validates proposed command parameters.
#[derive(Debug, Clone, Default)]
pub struct Guard {
    config: GuardConfig,
}

impl Guard {
    /// Create a new guard with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a guard with custom configuration
    pub fn with_config(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Validate the parameters of an `ADD_USER` envelope
    pub fn validate_add_user(&self, envelope: &CommandEnvelope) -> Result<AddUserParams> {
        if envelope.action != CommandAction::AddUser {
            return Err(GuardError::UnsupportedAction {
                action: envelope.action.to_string(),
            });
        }

        let name = self.required_str(envelope, "name")?.trim();
        if name.is_empty() {
            return Err(GuardError::InvalidField {
                field: "name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if name.chars().count() > self.config.max_name_chars {
            return Err(GuardError::InvalidField {
                field: "name".to_string(),
                message: format!("longer than {} characters", self.config.max_name_chars),
            });
        }
        if name.chars().any(char::is_control) {
            return Err(GuardError::InvalidField {
                field: "name".to_string(),
                message: "contains control characters".to_string(),
            });
        }

        let role = self
            .required_str(envelope, "role")?
            .parse::<UserRole>()
            .map_err(|e| GuardError::InvalidField {
                field: "role".to_string(),
                message: e.to_string(),
            })?;

        Ok(AddUserParams {
            name: name.to_string(),
            role,
        })
    }

    fn required_str<'a>(&self, envelope: &'a CommandEnvelope, field: &str) -> Result<&'a str> {
        match envelope.params.get(field) {
            None | Some(serde_json::Value::Null) => Err(GuardError::MissingField {
                field: field.to_string(),
            }),
            Some(value) => value.as_str().ok_or_else(|| GuardError::InvalidField {
                field: field.to_string(),
                message: "expected a string".to_string(),
            }),
        }
    }
}
