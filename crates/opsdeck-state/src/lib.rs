//! OpsDeck State - Session state and the reducer that mutates it
//!
//! A session holds the directory, infrastructure and activity records, the
//! three metric windows and the assistant transcript. Everything that
//! changes them is an [`Update`]:
//!
//! ```text
//! Simulator ──Tick──┐
//!                   ├──▶ store task ──▶ SessionState::apply ──▶ snapshot + events
//! Assistant ─Prompt─┤
//!           ─Reply──┘
//! ```
//!
//! `apply` is synchronous and free of randomness; the simulator and the
//! assistant do their work before queuing an update.

pub mod dispatch;
pub mod events;
pub mod seed;
pub mod simulator;
pub mod store;
pub mod views;

use chrono::{DateTime, Utc};
use opsdeck_guard::{AssistantReply, Guard};
use opsdeck_types::*;
use serde::Serialize;

pub use events::{PromptRejection, SessionEvent};
pub use simulator::{spawn_ticker, Simulator, TaskNudge, TickSample, DEFAULT_TICK};
pub use store::{spawn_store, StoreError, StoreHandle};

/// What the assistant produced for one accepted prompt
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantResponse {
    /// Fixed message that bypasses interpretation (missing key, backend failure)
    Notice(String),
    /// Interpreted backend reply
    Reply(AssistantReply),
}

/// A single mutation request
#[derive(Debug, Clone)]
pub enum Update {
    Tick(TickSample),
    PromptSubmitted(String),
    ReplyReceived {
        response: AssistantResponse,
        /// Timestamp used for any records the reply creates
        at: DateTime<Utc>,
    },
}

impl Update {
    /// Reply stamped with the current time
    pub fn reply(response: AssistantResponse) -> Self {
        Self::ReplyReceived {
            response,
            at: Utc::now(),
        }
    }
}

/// Complete in-memory state of one dashboard session
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub users: Vec<User>,
    pub logs: Vec<LogEntry>,
    pub resources: Vec<Resource>,
    pub tasks: Vec<Task>,
    pub notifications: Vec<Notification>,

    pub cpu: MetricWindow,
    pub ram: MetricWindow,
    pub network: MetricWindow,

    /// Starts with the assistant greeting
    pub transcript: Vec<ChatTurn>,
    /// True while a backend request is outstanding
    pub assistant_busy: bool,
    /// Number of simulator ticks applied
    pub ticks: u64,

    #[serde(skip)]
    guard: Guard,
}

impl SessionState {
    /// Seed records with timestamps relative to now
    pub fn seeded(window: usize) -> Self {
        Self::seeded_at(Utc::now(), window)
    }

    pub fn seeded_at(now: DateTime<Utc>, window: usize) -> Self {
        Self {
            users: seed::initial_users(now),
            logs: seed::initial_logs(now),
            resources: seed::initial_resources(),
            tasks: seed::initial_tasks(),
            notifications: seed::initial_notifications(now),
            cpu: MetricWindow::new(window),
            ram: MetricWindow::new(window),
            network: MetricWindow::new(window),
            transcript: vec![ChatTurn::assistant(ASSISTANT_GREETING)],
            assistant_busy: false,
            ticks: 0,
            guard: Guard::new(),
        }
    }

    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    pub fn window(&self, kind: MetricKind) -> &MetricWindow {
        match kind {
            MetricKind::Cpu => &self.cpu,
            MetricKind::Ram => &self.ram,
            MetricKind::Network => &self.network,
        }
    }

    /// Apply one update and return the events it caused
    pub fn apply(&mut self, update: Update) -> Vec<SessionEvent> {
        match update {
            Update::Tick(sample) => self.apply_tick(sample),
            Update::PromptSubmitted(prompt) => self.submit_prompt(prompt),
            Update::ReplyReceived { response, at } => self.receive_reply(response, at),
        }
    }

    fn apply_tick(&mut self, sample: TickSample) -> Vec<SessionEvent> {
        self.cpu.push(MetricSample::new(sample.label.clone(), sample.cpu));
        self.ram.push(MetricSample::new(sample.label.clone(), sample.ram));
        self.network.push(MetricSample::new(sample.label, sample.network));
        self.ticks += 1;

        let advanced_task = sample
            .task
            .and_then(|nudge| self.tasks.get_mut(nudge.index).map(|task| (task, nudge.increment)))
            .and_then(|(task, increment)| {
                if task.status != TaskStatus::InProgress || task.progress >= 100 {
                    return None;
                }
                task.progress = task.progress.saturating_add(increment).min(100);
                if task.progress == 100 {
                    task.status = TaskStatus::Completed;
                }
                Some(task.id)
            });

        vec![SessionEvent::Ticked {
            tick: self.ticks,
            advanced_task,
        }]
    }

    fn submit_prompt(&mut self, prompt: String) -> Vec<SessionEvent> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return vec![SessionEvent::PromptRejected {
                reason: PromptRejection::Empty,
            }];
        }
        if self.assistant_busy {
            tracing::debug!("prompt rejected while a request is in flight");
            return vec![SessionEvent::PromptRejected {
                reason: PromptRejection::Busy,
            }];
        }

        let history = self.transcript.clone();
        self.assistant_busy = true;
        let turn = self.append_turn(ChatTurn::user(prompt));

        vec![
            SessionEvent::PromptAccepted {
                prompt: prompt.to_string(),
                history,
            },
            turn,
        ]
    }

    fn receive_reply(&mut self, response: AssistantResponse, at: DateTime<Utc>) -> Vec<SessionEvent> {
        self.assistant_busy = false;

        match response {
            AssistantResponse::Notice(text) | AssistantResponse::Reply(AssistantReply::PlainText(text)) => {
                vec![self.append_turn(ChatTurn::assistant(text))]
            }
            AssistantResponse::Reply(AssistantReply::Command(envelope)) => {
                let mut events = vec![self.append_turn(ChatTurn::assistant(dispatch::executing_notice(
                    &envelope.action,
                )))];
                events.extend(self.dispatch(envelope, at));
                events
            }
        }
    }

    fn append_turn(&mut self, turn: ChatTurn) -> SessionEvent {
        self.transcript.push(turn.clone());
        SessionEvent::TurnAppended { turn }
    }
}
