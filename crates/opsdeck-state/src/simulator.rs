//! Synthetic metric and task simulator
//!
//! The simulator owns all randomness. Each call to [`Simulator::sample`]
//! produces a [`TickSample`] that the reducer applies deterministically.

use std::time::Duration;

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::store::StoreHandle;
use crate::Update;

/// Default interval between ticks
pub const DEFAULT_TICK: Duration = Duration::from_millis(2000);

/// Largest progress step a task can take in one tick
pub const MAX_TASK_STEP: u8 = 4;

/// Progress nudge for one task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskNudge {
    /// Position in the task collection
    pub index: usize,
    pub increment: u8,
}

/// Everything one tick changes, decided up front
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSample {
    /// Local wall-clock label, `HH:MM:SS`
    pub label: String,
    pub cpu: u8,
    pub ram: u8,
    pub network: u8,
    pub task: Option<TaskNudge>,
}

/// Random source for ticks
pub struct Simulator {
    rng: StdRng,
}

impl Simulator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence, used by `opsdeck simulate --seed`
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw one tick for a session holding `task_count` tasks
    pub fn sample(&mut self, task_count: usize, label: impl Into<String>) -> TickSample {
        let task = (task_count > 0).then(|| TaskNudge {
            index: self.rng.gen_range(0..task_count),
            increment: self.rng.gen_range(0..=MAX_TASK_STEP),
        });

        TickSample {
            label: label.into(),
            cpu: self.rng.gen_range(20..80),
            ram: self.rng.gen_range(40..90),
            network: self.rng.gen_range(10..80),
            task,
        }
    }

    /// Draw one tick labelled with the current local time
    pub fn sample_now(&mut self, task_count: usize) -> TickSample {
        let label = Local::now().format("%H:%M:%S").to_string();
        self.sample(task_count, label)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed one tick into the store every `period` until the store closes
pub fn spawn_ticker(handle: StoreHandle, mut simulator: Simulator, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            let task_count = handle.snapshot().tasks.len();
            let sample = simulator.sample_now(task_count);
            if handle.apply(Update::Tick(sample)).await.is_err() {
                tracing::debug!("store closed, ticker stopping");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_stay_in_range() {
        let mut simulator = Simulator::seeded(7);
        for _ in 0..500 {
            let sample = simulator.sample(4, "12:00:00");
            assert!((20..80).contains(&sample.cpu));
            assert!((40..90).contains(&sample.ram));
            assert!((10..80).contains(&sample.network));

            let nudge = sample.task.expect("tasks exist");
            assert!(nudge.index < 4);
            assert!(nudge.increment <= MAX_TASK_STEP);
        }
    }

    #[test]
    fn test_no_task_nudge_without_tasks() {
        let mut simulator = Simulator::seeded(1);
        assert_eq!(simulator.sample(0, "12:00:00").task, None);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = Simulator::seeded(42);
        let mut b = Simulator::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.sample(4, "x"), b.sample(4, "x"));
        }
    }

    #[test]
    fn test_label_format() {
        let mut simulator = Simulator::seeded(3);
        let label = simulator.sample_now(1).label;
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
