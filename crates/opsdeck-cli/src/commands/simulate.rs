//! Simulate command - apply ticks without a timer and dump the result

use chrono::{Duration, Local};
use opsdeck_state::{SessionState, Simulator, Update, DEFAULT_TICK};
use serde_json::json;

pub fn run_simulate(ticks: u64, window: usize, seed: Option<u64>) -> anyhow::Result<()> {
    let mut state = SessionState::seeded(window);
    let mut simulator = match seed {
        Some(seed) => Simulator::seeded(seed),
        None => Simulator::new(),
    };

    let period = Duration::from_std(DEFAULT_TICK)?;
    let mut at = Local::now();
    for _ in 0..ticks {
        at += period;
        let sample = simulator.sample(state.tasks.len(), at.format("%H:%M:%S").to_string());
        for event in state.apply(Update::Tick(sample)) {
            tracing::debug!(event = %event.summary(), "applied");
        }
    }

    let output = json!({
        "ticks": state.ticks,
        "window": window,
        "cpu": state.cpu,
        "ram": state.ram,
        "network": state.network,
        "tasks": state.tasks,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
