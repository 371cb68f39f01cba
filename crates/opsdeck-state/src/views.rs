//! Read-only projections used by the TUI and CLI

use std::fmt;
use std::str::FromStr;

use opsdeck_types::*;
use serde::Serialize;

use crate::SessionState;

/// Case-insensitive substring match on name or role; an empty query matches all
pub fn filter_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    let needle = query.trim().to_lowercase();
    users
        .iter()
        .filter(|user| {
            needle.is_empty()
                || user.name.to_lowercase().contains(&needle)
                || user.role.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Log level filter for the activity view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFilter {
    #[default]
    All,
    Level(LogLevel),
}

impl LogFilter {
    /// Cycle All -> INFO -> WARN -> ERROR -> CRITICAL -> All
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Level(LogLevel::Info),
            Self::Level(LogLevel::Info) => Self::Level(LogLevel::Warn),
            Self::Level(LogLevel::Warn) => Self::Level(LogLevel::Error),
            Self::Level(LogLevel::Error) => Self::Level(LogLevel::Critical),
            Self::Level(LogLevel::Critical) => Self::All,
        }
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        match self {
            Self::All => true,
            Self::Level(level) => entry.level == *level,
        }
    }
}

impl fmt::Display for LogFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Level(level) => write!(f, "{}", level),
        }
    }
}

impl FromStr for LogFilter {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Level)
    }
}

/// Matching entries, newest first
pub fn filter_logs(logs: &[LogEntry], filter: LogFilter) -> Vec<&LogEntry> {
    let mut matching: Vec<&LogEntry> = logs.iter().filter(|entry| filter.matches(entry)).collect();
    matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    matching
}

/// The most recent `limit` entries, oldest first
pub fn recent_logs(logs: &[LogEntry], limit: usize) -> Vec<&LogEntry> {
    let mut newest = filter_logs(logs, LogFilter::All);
    newest.truncate(limit);
    newest.reverse();
    newest
}

/// Usage band for resource gauges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UsageBand {
    Normal,
    Elevated,
    Critical,
}

pub fn usage_band(usage: u8) -> UsageBand {
    if usage > 90 {
        UsageBand::Critical
    } else if usage > 75 {
        UsageBand::Elevated
    } else {
        UsageBand::Normal
    }
}

/// Headline numbers for the dashboard view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub uptime: &'static str,
    pub user_count: usize,
    pub alerts_triggered: usize,
    pub logs_generated: String,
}

impl DashboardStats {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            uptime: "99.98%",
            user_count: state.users.len(),
            alerts_triggered: state
                .notifications
                .iter()
                .filter(|n| n.level == NotificationLevel::Critical)
                .count(),
            logs_generated: format_log_count(state.logs.len()),
        }
    }
}

/// Log count in thousands with one decimal, e.g. `0.0k`, `1.5k`
pub fn format_log_count(count: usize) -> String {
    format!("{:.1}k", count as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_user_search() {
        let users = crate::seed::initial_users(Utc::now());

        let names = |query| {
            filter_users(&users, query)
                .into_iter()
                .map(|u| u.name.as_str())
                .collect::<Vec<_>>()
        };

        assert_eq!(names("").len(), 4);
        assert_eq!(names("jane"), vec!["Operator Jane"]);
        assert_eq!(names("OPERATOR"), vec!["Operator Jane", "System Analyst"]);
        assert!(names("nobody").is_empty());
    }

    #[test]
    fn test_log_filter_sorts_newest_first() {
        let logs = crate::seed::initial_logs(Utc::now());

        let all: Vec<u32> = filter_logs(&logs, LogFilter::All).iter().map(|l| l.id).collect();
        assert_eq!(all, vec![4, 3, 2, 1]);

        let info: Vec<u32> = filter_logs(&logs, LogFilter::Level(LogLevel::Info))
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(info, vec![2, 1]);

        assert!(filter_logs(&logs, LogFilter::Level(LogLevel::Error)).is_empty());
    }

    #[test]
    fn test_recent_logs_limit() {
        let now = Utc::now();
        let logs: Vec<LogEntry> = (1..=30)
            .map(|id| LogEntry {
                id,
                timestamp: now - Duration::seconds(100 - id as i64),
                level: LogLevel::Info,
                message: format!("entry {id}"),
            })
            .collect();

        let recent: Vec<u32> = recent_logs(&logs, 20).iter().map(|l| l.id).collect();
        assert_eq!(recent, (11..=30).collect::<Vec<u32>>());
    }

    #[test]
    fn test_log_filter_parsing_and_cycle() {
        assert_eq!("all".parse::<LogFilter>(), Ok(LogFilter::All));
        assert_eq!("critical".parse::<LogFilter>(), Ok(LogFilter::Level(LogLevel::Critical)));
        assert!("verbose".parse::<LogFilter>().is_err());

        let mut filter = LogFilter::All;
        for _ in 0..5 {
            filter = filter.next();
        }
        assert_eq!(filter, LogFilter::All);
    }

    #[test]
    fn test_usage_bands() {
        assert_eq!(usage_band(92), UsageBand::Critical);
        assert_eq!(usage_band(91), UsageBand::Critical);
        assert_eq!(usage_band(90), UsageBand::Elevated);
        assert_eq!(usage_band(78), UsageBand::Elevated);
        assert_eq!(usage_band(75), UsageBand::Normal);
        assert_eq!(usage_band(0), UsageBand::Normal);
    }

    #[test]
    fn test_dashboard_stats_for_seed() {
        let stats = DashboardStats::from_state(&SessionState::seeded(10));

        assert_eq!(stats.user_count, 4);
        assert_eq!(stats.alerts_triggered, 1);
        assert_eq!(stats.logs_generated, "0.0k");
        assert_eq!(format_log_count(1500), "1.5k");
    }
}
