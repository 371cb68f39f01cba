//! Ask command - one assistant exchange against a fresh session

use colored::*;
use opsdeck_assistant::Assistant;
use opsdeck_guard::{Guard, GuardConfig};
use opsdeck_state::{spawn_store, PromptRejection, SessionEvent, SessionState};

use crate::display;

pub async fn run_ask(prompt: &str, window: usize, guard: GuardConfig) -> anyhow::Result<()> {
    let assistant = Assistant::from_env();
    if !assistant.is_configured() {
        display::warning("No API key configured; the assistant will answer with a fixed notice");
    }

    let (store, _task) = spawn_store(SessionState::seeded(window).with_guard(Guard::with_config(guard)));

    display::section("AI Assistant");
    let pb = super::spinner("Waiting for the assistant...");
    let events = assistant.converse(&store, prompt).await;
    pb.finish_and_clear();
    let events = events?;

    for event in &events {
        match event {
            SessionEvent::TurnAppended { turn } => display::turn(turn),
            SessionEvent::UserAdded { user } => {
                display::success(&format!("User #{} \"{}\" created", user.id, user.name))
            }
            SessionEvent::CommandRejected { action, reason } => {
                display::error(&format!("{} rejected: {}", action, reason))
            }
            SessionEvent::CommandIgnored { action } => {
                display::warning(&format!("Unknown action {} was ignored", action))
            }
            SessionEvent::PromptRejected { reason } => match reason {
                PromptRejection::Empty => display::error("Prompt is empty"),
                PromptRejection::Busy => display::error("Assistant is busy"),
            },
            _ => {}
        }
    }

    let snapshot = store.snapshot();
    display::section("Users");
    display::user_table(&snapshot.users);
    println!();
    display::info(&format!(
        "{} users, provider: {}",
        snapshot.users.len().to_string().bright_cyan(),
        assistant.provider_kind()
    ));

    Ok(())
}
