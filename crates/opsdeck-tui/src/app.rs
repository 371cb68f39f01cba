//! Terminal UI state and key handling
//!
//! [`App`] holds everything the dashboard needs that is not session state:
//! the active view, input buffers, the log filter and the last insight.
//! Key handling is synchronous and returns an [`Action`] for the event loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use opsdeck_assistant::InsightKind;
use opsdeck_state::views::LogFilter;
use opsdeck_state::PromptRejection;

/// Top-level views, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Users,
    Resources,
    Activity,
}

impl View {
    pub const ALL: [View; 4] = [View::Dashboard, View::Users, View::Resources, View::Activity];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Users => "Users",
            Self::Resources => "Resources",
            Self::Activity => "Activity",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Insight offered on this view, if any
    pub fn insight(&self) -> Option<InsightKind> {
        match self {
            Self::Dashboard => None,
            Self::Users => Some(InsightKind::Roles),
            Self::Resources => Some(InsightKind::Resources),
            Self::Activity => Some(InsightKind::Logs),
        }
    }
}

/// Where key presses go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Single-key hotkeys
    Navigate,
    /// Typing into the assistant prompt
    Chat,
    /// Typing into the user search box
    Search,
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    SubmitPrompt(String),
    RequestInsight(InsightKind),
}

/// Result panel for the current view's insight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightPanel {
    Pending(InsightKind),
    Ready(InsightKind, String),
}

impl InsightPanel {
    pub fn kind(&self) -> InsightKind {
        match self {
            Self::Pending(kind) | Self::Ready(kind, _) => *kind,
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub view: View,
    pub focus: Focus,
    pub prompt: String,
    pub search: String,
    pub log_filter: LogFilter,
    pub insight: Option<InsightPanel>,
    pub status_line: String,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            view: View::Dashboard,
            focus: Focus::Navigate,
            prompt: String::new(),
            search: String::new(),
            log_filter: LogFilter::All,
            insight: None,
            status_line: "ready".to_string(),
        }
    }

    /// Insight panel for the active view only
    pub fn visible_insight(&self) -> Option<&InsightPanel> {
        self.insight
            .as_ref()
            .filter(|panel| self.view.insight() == Some(panel.kind()))
    }

    pub fn insight_ready(&mut self, kind: InsightKind, text: String) {
        self.insight = Some(InsightPanel::Ready(kind, text));
    }

    /// The store refused a prompt that already left the input box
    ///
    /// The text goes back into the box unless the operator has started
    /// typing something new.
    pub fn prompt_rejected(&mut self, prompt: String, reason: PromptRejection) {
        if self.prompt.is_empty() {
            self.prompt = prompt;
        }
        self.status_line = match reason {
            PromptRejection::Busy => "assistant is busy, prompt not sent".to_string(),
            PromptRejection::Empty => "prompt is empty".to_string(),
        };
    }

    /// Handle one key press; `busy` is the assistant's in-flight flag
    pub fn handle_key(&mut self, key: KeyEvent, busy: bool) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match self.focus {
            Focus::Navigate => self.navigate(key.code),
            Focus::Chat => self.chat(key.code, busy),
            Focus::Search => self.search(key.code),
        }
    }

    fn navigate(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
            KeyCode::Tab => self.switch(self.view.next()),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.switch(View::ALL[index]);
            }
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Char('i') => {
                self.focus = Focus::Chat;
                self.status_line = "typing a prompt (Enter send, Esc leave)".to_string();
            }
            KeyCode::Char('/') if self.view == View::Users => {
                self.focus = Focus::Search;
                self.status_line = "searching users (Enter/Esc done)".to_string();
            }
            KeyCode::Char('f') | KeyCode::Char('F') if self.view == View::Activity => {
                self.log_filter = self.log_filter.next();
                self.status_line = format!("log filter: {}", self.log_filter);
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                let Some(kind) = self.view.insight() else {
                    self.status_line = "no insight for this view".to_string();
                    return Action::None;
                };
                if matches!(self.insight, Some(InsightPanel::Pending(_))) {
                    self.status_line = "insight already in progress".to_string();
                    return Action::None;
                }
                self.insight = Some(InsightPanel::Pending(kind));
                self.status_line = format!("requesting {}", kind.title().to_lowercase());
                return Action::RequestInsight(kind);
            }
            KeyCode::Esc => {
                self.insight = None;
            }
            _ => {}
        }
        Action::None
    }

    fn chat(&mut self, code: KeyCode, busy: bool) -> Action {
        match code {
            KeyCode::Esc => {
                self.focus = Focus::Navigate;
                self.status_line = "ready".to_string();
            }
            KeyCode::Enter => {
                if busy {
                    self.status_line = "assistant is busy".to_string();
                } else if !self.prompt.trim().is_empty() {
                    self.status_line = "waiting for the assistant".to_string();
                    return Action::SubmitPrompt(std::mem::take(&mut self.prompt));
                }
            }
            KeyCode::Backspace => {
                self.prompt.pop();
            }
            KeyCode::Char(c) => self.prompt.push(c),
            _ => {}
        }
        Action::None
    }

    fn search(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Esc | KeyCode::Enter => {
                self.focus = Focus::Navigate;
                self.status_line = "ready".to_string();
            }
            KeyCode::Backspace => {
                self.search.pop();
            }
            KeyCode::Char(c) => self.search.push(c),
            _ => {}
        }
        Action::None
    }

    fn switch(&mut self, view: View) {
        self.view = view;
        self.status_line = format!("{} view", view.title().to_lowercase());
    }
}
