//! Flat domain records shown by the dashboard
//!
//! Every record carries an identifier, a small enumerated status or level,
//! and a handful of scalar fields. No referential integrity is enforced
//! between collections.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypesError;

// ============================================================================
// Users
// ============================================================================

/// Access level of a dashboard user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Operator,
    Viewer,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Operator, UserRole::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Operator => "Operator",
            Self::Viewer => "Viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = TypesError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TypesError::UnknownRole(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
        }
    }
}

/// A dashboard user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login: DateTime<Utc>,
}

// ============================================================================
// Resources
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Storage,
    #[serde(rename = "API")]
    Api,
    Device,
    Service,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage => write!(f, "Storage"),
            Self::Api => write!(f, "API"),
            Self::Device => write!(f, "Device"),
            Self::Service => write!(f, "Service"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceStatus {
    Online,
    Offline,
    Warning,
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "Online"),
            Self::Offline => write!(f, "Offline"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// A managed infrastructure resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub status: ResourceStatus,
    /// Usage as a percentage (0-100)
    pub usage: u8,
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// A long-running background task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub name: String,
    /// Completion percentage (0-100)
    pub progress: u8,
    pub status: TaskStatus,
}

// ============================================================================
// Logs and notifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Critical,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TypesError::UnknownLogLevel(trimmed.to_string()))
    }
}

/// One line of the system activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u32,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Warning,
    Critical,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// An operator-facing alert shown in the header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u32,
    pub message: String,
    pub level: NotificationLevel,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!("Operator".parse::<UserRole>(), Ok(UserRole::Operator));
        assert_eq!("  admin ".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!("VIEWER".parse::<UserRole>(), Ok(UserRole::Viewer));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = "Superuser".parse::<UserRole>().unwrap_err();
        assert_eq!(err, TypesError::UnknownRole("Superuser".to_string()));
        assert!("".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_log_level_wire_names() {
        let json = serde_json::to_string(&LogLevel::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warn));
    }

    #[test]
    fn test_resource_serialization_uses_dashboard_names() {
        let resource = Resource {
            id: "api-gateway".to_string(),
            name: "Public API Gateway".to_string(),
            kind: ResourceKind::Api,
            status: ResourceStatus::Online,
            usage: 45,
        };
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["type"], "API");
        assert_eq!(json["status"], "Online");
    }

    #[test]
    fn test_task_status_display() {
        assert_eq!(TaskStatus::InProgress.to_string(), "In Progress");
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
    }
}
