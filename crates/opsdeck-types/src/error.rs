//! Error types for OpsDeck domain records

use thiserror::Error;

/// Failures when converting free-form text into domain enums
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// Role name outside Admin / Operator / Viewer
    #[error("unknown role '{0}' (expected Admin, Operator or Viewer)")]
    UnknownRole(String),

    /// Log level name outside INFO / WARN / ERROR / CRITICAL
    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}
