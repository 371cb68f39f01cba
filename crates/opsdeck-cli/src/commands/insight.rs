//! Insight command - one AI insight over the seeded session

use opsdeck_assistant::{Assistant, InsightKind, LOG_SAMPLE_SIZE};
use opsdeck_state::SessionState;

use crate::display;

pub async fn run_insight(kind: InsightKind) -> anyhow::Result<()> {
    let assistant = Assistant::from_env();
    let state = SessionState::seeded(opsdeck_types::DEFAULT_WINDOW);

    display::section(&format!("AI {}", kind.title()));
    match kind {
        InsightKind::Logs => {
            let sampled = state.logs.len().min(LOG_SAMPLE_SIZE);
            display::kv("Log entries", &sampled.to_string());
        }
        InsightKind::Resources => display::kv("Resources", &state.resources.len().to_string()),
        InsightKind::Roles => display::kv("Roles", "Admin, Operator, Viewer"),
    }
    println!();

    let pb = super::spinner("Analyzing...");
    let text = assistant.insight(kind, &state).await;
    pb.finish_and_clear();

    for line in text.lines() {
        println!("  {}", line);
    }
    Ok(())
}
