//! Command dispatcher
//!
//! Executes a [`CommandEnvelope`] that the guard has already extracted from a
//! reply. Only `ADD_USER` mutates records; the other recognized actions
//! answer with a fixed turn.

use chrono::{DateTime, Utc};
use opsdeck_guard::{CommandAction, CommandEnvelope};
use opsdeck_types::*;

use crate::{SessionEvent, SessionState};

pub const OPTIMIZE_MEMORY_REPLY: &str = "Simulating memory optimization... Done. Freed 2.5GB of RAM.";
pub const SHOW_PERFORMANCE_REPLY: &str =
    "Current system performance: CPU at 45%, RAM at 62%, Network stable.";

/// Turn shown before a command runs
pub fn executing_notice(action: &CommandAction) -> String {
    format!("Executing action: {}", action)
}

impl SessionState {
    pub(crate) fn dispatch(&mut self, envelope: CommandEnvelope, at: DateTime<Utc>) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        match &envelope.action {
            CommandAction::AddUser => match self.guard.validate_add_user(&envelope) {
                Ok(params) => {
                    let user = User {
                        id: self.next_user_id(),
                        name: params.name,
                        role: params.role,
                        status: UserStatus::Active,
                        last_login: at,
                    };
                    tracing::info!(id = user.id, name = %user.name, role = %user.role, "ADD_USER dispatched");

                    let text = format!(
                        "Action complete: User \"{}\" has been added as an \"{}\".",
                        user.name, user.role
                    );
                    self.users.push(user.clone());
                    events.push(SessionEvent::UserAdded { user });
                    events.push(self.append_turn(ChatTurn::assistant(text)));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "ADD_USER rejected");
                    let text = format!("Could not complete action {}: {}.", envelope.action, e);
                    events.push(SessionEvent::CommandRejected {
                        action: envelope.action.to_string(),
                        reason: e.to_string(),
                    });
                    events.push(self.append_turn(ChatTurn::assistant(text)));
                }
            },
            CommandAction::OptimizeMemory => {
                tracing::info!("OPTIMIZE_MEMORY dispatched");
                events.push(self.append_turn(ChatTurn::assistant(OPTIMIZE_MEMORY_REPLY)));
            }
            CommandAction::ShowPerformance => {
                tracing::info!("SHOW_PERFORMANCE dispatched");
                events.push(self.append_turn(ChatTurn::assistant(SHOW_PERFORMANCE_REPLY)));
            }
            CommandAction::Unrecognized(name) => {
                tracing::warn!(action = %name, "unrecognized action ignored");
                events.push(SessionEvent::CommandIgnored { action: name.clone() });
            }
        }

        events
    }

    /// One past the largest id in use, so ids stay unique even after removals
    fn next_user_id(&self) -> u32 {
        self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_user(name: &str, role: &str) -> CommandEnvelope {
        CommandEnvelope::new(CommandAction::AddUser)
            .with_param("name", name)
            .with_param("role", role)
    }

    #[test]
    fn test_add_user_appends_record_and_confirms() {
        let mut state = SessionState::seeded(10);
        let before = Utc::now();

        let events = state.dispatch(add_user("Alex", "Operator"), Utc::now());

        assert_eq!(state.users.len(), 5);
        let user = state.users.last().unwrap();
        assert_eq!(user.id, 5);
        assert_eq!(user.name, "Alex");
        assert_eq!(user.role, UserRole::Operator);
        assert_eq!(user.status, UserStatus::Active);
        assert!(user.last_login >= before);

        assert_eq!(
            state.transcript.last().unwrap().text,
            "Action complete: User \"Alex\" has been added as an \"Operator\"."
        );
        assert!(matches!(events[0], SessionEvent::UserAdded { .. }));
    }

    #[test]
    fn test_ids_follow_the_largest_existing_id() {
        let mut state = SessionState::seeded(10);
        state.users.retain(|u| u.id != 2);

        state.dispatch(add_user("Dana", "Viewer"), Utc::now());

        assert_eq!(state.users.last().unwrap().id, 5);
    }

    #[test]
    fn test_invalid_add_user_leaves_records_untouched() {
        let mut state = SessionState::seeded(10);
        let users = state.users.clone();

        for envelope in [
            add_user("", "Operator"),
            add_user("Alex", "Superuser"),
            CommandEnvelope::new(CommandAction::AddUser),
        ] {
            let events = state.dispatch(envelope, Utc::now());
            assert!(matches!(events[0], SessionEvent::CommandRejected { .. }));
            assert!(state
                .transcript
                .last()
                .unwrap()
                .text
                .starts_with("Could not complete action ADD_USER: "));
        }

        assert_eq!(state.users, users);
    }

    #[test]
    fn test_optimize_memory_is_idempotent() {
        let mut state = SessionState::seeded(10);
        let users = state.users.clone();
        let resources = state.resources.clone();

        for _ in 0..3 {
            state.dispatch(CommandEnvelope::new(CommandAction::OptimizeMemory), Utc::now());
        }

        assert_eq!(state.users, users);
        assert_eq!(state.resources, resources);
        assert_eq!(state.transcript.last().unwrap().text, OPTIMIZE_MEMORY_REPLY);
    }

    #[test]
    fn test_unrecognized_action_adds_no_turn() {
        let mut state = SessionState::seeded(10);
        let turns = state.transcript.len();

        let events = state.dispatch(
            CommandEnvelope::new(CommandAction::from_name("REBOOT")),
            Utc::now(),
        );

        assert_eq!(state.transcript.len(), turns);
        assert_eq!(
            events,
            vec![SessionEvent::CommandIgnored {
                action: "REBOOT".to_string()
            }]
        );
    }
}
