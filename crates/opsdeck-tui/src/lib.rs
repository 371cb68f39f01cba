//! OpsDeck TUI - Ratatui dashboard over a live session
//!
//! The dashboard owns a session store, a simulator ticker and an assistant.
//! The draw loop only reads snapshots; prompts and insight requests run on
//! spawned tasks so the screen keeps refreshing while the backend answers.

pub mod app;
mod render;

use std::io::Stdout;
use std::time::Duration;

use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use opsdeck_assistant::{Assistant, InsightKind};
use opsdeck_guard::{Guard, GuardConfig};
use opsdeck_state::{
    spawn_store, spawn_ticker, PromptRejection, SessionEvent, SessionState, Simulator, StoreError, StoreHandle,
    DEFAULT_TICK,
};
use opsdeck_types::DEFAULT_WINDOW;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use thiserror::Error;
use tokio::sync::mpsc;

pub use app::{Action, App, Focus, View};

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Dashboard settings
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Interval between simulator ticks
    pub tick: Duration,
    /// Samples kept per metric series
    pub window: usize,
    /// Limits applied to assistant commands
    pub guard: GuardConfig,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            window: DEFAULT_WINDOW,
            guard: GuardConfig::default(),
        }
    }
}

/// Results of spawned assistant work, drained by the draw loop
#[derive(Debug)]
enum Completion {
    Insight(InsightKind, String),
    PromptRejected(String, PromptRejection),
}

/// Run the interactive dashboard until the operator quits
pub async fn run_dashboard(config: TuiConfig, assistant: Assistant) -> Result<(), TuiError> {
    let mut terminal = setup_terminal()?;

    let state = SessionState::seeded(config.window).with_guard(Guard::with_config(config.guard.clone()));
    let (store, store_task) = spawn_store(state);
    let ticker = spawn_ticker(store.clone(), Simulator::new(), config.tick);
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<Completion>();

    tracing::info!(
        tick_ms = config.tick.as_millis() as u64,
        window = config.window,
        provider = %assistant.provider_kind(),
        "dashboard started"
    );

    let mut app = App::new();

    let result = loop {
        if store_task.is_finished() {
            break Err(TuiError::Store(StoreError::Closed));
        }

        while let Ok(completion) = completion_rx.try_recv() {
            match completion {
                Completion::Insight(kind, text) => {
                    app.insight_ready(kind, text);
                    app.status_line = format!("{} ready", kind.title().to_lowercase());
                }
                Completion::PromptRejected(prompt, reason) => app.prompt_rejected(prompt, reason),
            }
        }

        let snapshot = store.snapshot();
        if let Err(e) = terminal.draw(|frame| {
            render::draw_ui(frame, &app, &snapshot, assistant.provider_kind());
        }) {
            break Err(e.into());
        }

        match event::poll(Duration::from_millis(150)) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => break Err(e.into()),
        }
        let key = match event::read() {
            Ok(CEvent::Key(key)) if key.kind == KeyEventKind::Press => key,
            Ok(_) => continue,
            Err(e) => break Err(e.into()),
        };

        match app.handle_key(key, snapshot.assistant_busy) {
            Action::None => {}
            Action::Quit => break Ok(()),
            Action::SubmitPrompt(prompt) => submit_prompt(&assistant, &store, prompt, completion_tx.clone()),
            Action::RequestInsight(kind) => {
                request_insight(&assistant, &store, kind, completion_tx.clone())
            }
        }
    };

    ticker.abort();

    restore_terminal();
    terminal.show_cursor()?;
    tracing::info!("dashboard closed");
    result
}

type DashboardTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode plus alternate screen; undone again if any step fails
fn setup_terminal() -> Result<DashboardTerminal, TuiError> {
    enable_raw_mode()?;
    on_error(enter_alternate_screen(), restore_terminal)
}

fn enter_alternate_screen() -> Result<DashboardTerminal, TuiError> {
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        tracing::warn!(error = %e, "failed to leave raw mode");
    }
    if let Err(e) = execute!(std::io::stdout(), LeaveAlternateScreen) {
        tracing::warn!(error = %e, "failed to leave alternate screen");
    }
}

fn on_error<T>(result: Result<T, TuiError>, cleanup: impl FnOnce()) -> Result<T, TuiError> {
    if result.is_err() {
        cleanup();
    }
    result
}

fn submit_prompt(
    assistant: &Assistant,
    store: &StoreHandle,
    prompt: String,
    results: mpsc::UnboundedSender<Completion>,
) {
    let assistant = assistant.clone();
    let store = store.clone();
    tokio::spawn(async move {
        match assistant.converse(&store, &prompt).await {
            Ok(events) => {
                for event in events {
                    tracing::debug!(event = %event.summary(), "session event");
                    if let SessionEvent::PromptRejected { reason } = event {
                        let _ = results.send(Completion::PromptRejected(prompt.clone(), reason));
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "prompt dropped"),
        }
    });
}

fn request_insight(
    assistant: &Assistant,
    store: &StoreHandle,
    kind: InsightKind,
    results: mpsc::UnboundedSender<Completion>,
) {
    let assistant = assistant.clone();
    let snapshot = store.snapshot();
    tokio::spawn(async move {
        let text = assistant.insight(kind, &snapshot).await;
        // Ignore send errors (dashboard already closed)
        let _ = results.send(Completion::Insight(kind, text));
    });
}
