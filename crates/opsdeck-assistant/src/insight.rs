//! One-shot insight requests
//!
//! Each insight is a single prompt built from the current session, sent
//! without history or system instruction, and answered as plain text.

use std::fmt;
use std::str::FromStr;

use opsdeck_llm::{CompletionRequest, LLMError};
use opsdeck_state::views::recent_logs;
use opsdeck_state::SessionState;
use serde::Serialize;

use crate::prompt::{INSIGHTS_DISABLED, INSIGHT_FAILED};
use crate::Assistant;

/// Number of log entries included in a log analysis
pub const LOG_SAMPLE_SIZE: usize = 20;

const ROLE_RECOMMENDATION_PROMPT: &str = "Based on the following user roles in a system: Admin, Operator, Viewer. \
A new user is being added to manage system monitoring and basic troubleshooting tasks. \
They should not have permission to change system configurations or manage other users. \
Which role (Admin, Operator, or Viewer) would you recommend for this new user? \
Provide a brief justification. Respond in a single paragraph.";

/// The available insight requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    /// Patterns, security concerns and performance issues in recent logs
    Logs,
    /// Role recommendation for a monitoring-only user
    Roles,
    /// Allocation and optimization plan for resources
    Resources,
}

impl InsightKind {
    pub const ALL: [InsightKind; 3] = [InsightKind::Logs, InsightKind::Roles, InsightKind::Resources];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Logs => "Log Analysis",
            Self::Roles => "Role Recommendation",
            Self::Resources => "Resource Optimization Plan",
        }
    }

    /// Build the prompt for this insight from `state`
    pub fn prompt(&self, state: &SessionState) -> String {
        match self {
            Self::Logs => {
                let sample = recent_logs(&state.logs, LOG_SAMPLE_SIZE);
                format!(
                    "Analyze these system activity logs for unusual patterns, potential security concerns, \
                     or performance issues. Provide a brief summary of your findings.\n\nLogs:\n{}",
                    pretty_json(&sample)
                )
            }
            Self::Roles => ROLE_RECOMMENDATION_PROMPT.to_string(),
            Self::Resources => {
                let rows: Vec<ResourceRow<'_>> = state
                    .resources
                    .iter()
                    .map(|r| ResourceRow {
                        name: &r.name,
                        kind: r.kind.to_string(),
                        status: r.status.to_string(),
                        usage: r.usage,
                    })
                    .collect();
                format!(
                    "Analyze the following system resource data and provide a predictive resource allocation \
                     and optimization plan. Focus on high-usage resources and potential bottlenecks. \
                     Keep the response concise and actionable.\n\nResource Data:\n{}",
                    pretty_json(&rows)
                )
            }
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logs => write!(f, "logs"),
            Self::Roles => write!(f, "roles"),
            Self::Resources => write!(f, "resources"),
        }
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logs" => Ok(Self::Logs),
            "roles" => Ok(Self::Roles),
            "resources" => Ok(Self::Resources),
            other => Err(format!("unknown insight '{}'", other)),
        }
    }
}

#[derive(Serialize)]
struct ResourceRow<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: String,
    status: String,
    usage: u8,
}

fn pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

impl Assistant {
    /// Request one insight; failures collapse into a fixed message
    pub async fn insight(&self, kind: InsightKind, state: &SessionState) -> String {
        if !self.is_configured() {
            return INSIGHTS_DISABLED.to_string();
        }

        let request = CompletionRequest::prompt(kind.prompt(state));
        tracing::debug!(insight = %kind, "requesting insight");

        match self.llm().complete(request).await {
            Ok(response) => response.content,
            Err(LLMError::ProviderNotConfigured { .. }) => INSIGHTS_DISABLED.to_string(),
            Err(e) => {
                tracing::warn!(insight = %kind, error = %e, "insight request failed");
                INSIGHT_FAILED.to_string()
            }
        }
    }
}
