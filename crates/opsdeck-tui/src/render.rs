use opsdeck_llm::ProviderKind;
use opsdeck_state::views::{filter_logs, filter_users, usage_band, DashboardStats, UsageBand};
use opsdeck_state::SessionState;
use opsdeck_types::*;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Gauge, List, ListItem, Paragraph, Row, Sparkline, Table, Tabs, Wrap,
};
use ratatui::Frame;

use crate::app::{App, Focus, InsightPanel, View};

pub(crate) fn draw_ui(frame: &mut Frame<'_>, app: &App, state: &SessionState, provider: ProviderKind) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, vertical[0], state, provider);

    let titles: Vec<Line<'_>> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{} {}", i + 1, view.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.view.index())
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, vertical[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
        .split(vertical[2]);

    match app.view {
        View::Dashboard => render_dashboard(frame, body[0], state),
        View::Users => render_users(frame, body[0], app, state),
        View::Resources => render_resources(frame, body[0], app, state),
        View::Activity => render_activity(frame, body[0], app, state),
    }
    render_chat(frame, body[1], app, state);

    let footer = Paragraph::new(format!(
        "1-4/Tab views | C chat | / search | F log filter | A AI insight | Esc close | Q quit   {}",
        app.status_line
    ))
    .block(Block::default().borders(Borders::ALL).title("Hotkeys"));
    frame.render_widget(footer, vertical[3]);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &SessionState, provider: ProviderKind) {
    let alert = state
        .notifications
        .iter()
        .max_by_key(|n| (n.level == NotificationLevel::Critical, n.timestamp))
        .map(|n| {
            Span::styled(
                format!(" | {}", n.message),
                Style::default().fg(notification_color(n.level)),
            )
        })
        .unwrap_or_else(|| Span::raw(""));

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " OpsDeck v0.1.0 ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" assistant={} | ticks={}", provider, state.ticks)),
        alert,
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_dashboard(frame: &mut Frame<'_>, area: Rect, state: &SessionState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(6),
        ])
        .split(area);

    let stats = DashboardStats::from_state(state);
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(rows[0]);
    let values = [
        ("System Uptime", stats.uptime.to_string()),
        ("Active Users", stats.user_count.to_string()),
        ("Alerts Triggered", stats.alerts_triggered.to_string()),
        ("Logs Generated", stats.logs_generated.clone()),
    ];
    for (area, (title, value)) in cards.iter().zip(values) {
        frame.render_widget(
            Paragraph::new(Span::styled(value, Style::default().add_modifier(Modifier::BOLD)))
                .block(Block::default().borders(Borders::ALL).title(title)),
            *area,
        );
    }

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[1]);
    for (area, kind) in charts.iter().zip(MetricKind::ALL) {
        render_metric(frame, *area, kind, state.window(kind));
    }

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);
    render_tasks(frame, lower[0], &state.tasks);

    let notifications: Vec<ListItem<'_>> = state
        .notifications
        .iter()
        .map(|n| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<8} ", n.level.to_string()),
                    Style::default().fg(notification_color(n.level)),
                ),
                Span::raw(n.message.clone()),
            ]))
        })
        .collect();
    frame.render_widget(
        List::new(notifications).block(Block::default().borders(Borders::ALL).title("Notifications")),
        lower[1],
    );
}

fn render_metric(frame: &mut Frame<'_>, area: Rect, kind: MetricKind, window: &MetricWindow) {
    let data: Vec<u64> = window.values().into_iter().map(u64::from).collect();
    let title = match window.latest() {
        Some(sample) => format!("{} {}% @ {}", kind, sample.value, sample.label),
        None => format!("{} (waiting)", kind),
    };
    let color = match kind {
        MetricKind::Cpu => Color::Cyan,
        MetricKind::Ram => Color::Magenta,
        MetricKind::Network => Color::Green,
    };

    frame.render_widget(
        Sparkline::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .data(&data)
            .max(100)
            .style(Style::default().fg(color)),
        area,
    );
}

fn render_tasks(frame: &mut Frame<'_>, area: Rect, tasks: &[Task]) {
    let block = Block::default().borders(Borders::ALL).title("Tasks");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); tasks.len()])
        .split(inner);

    for (area, task) in rows.iter().zip(tasks) {
        let color = match task.status {
            TaskStatus::InProgress => Color::Cyan,
            TaskStatus::Completed => Color::Green,
            TaskStatus::Failed => Color::Red,
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .percent(u16::from(task.progress.min(100)))
            .label(format!("{} {}% ({})", task.name, task.progress, task.status));
        frame.render_widget(gauge, *area);
    }
}

fn render_users(frame: &mut Frame<'_>, area: Rect, app: &App, state: &SessionState) {
    let (main, insight_area) = split_for_insight(area, app);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(main);

    let search_style = if app.focus == Focus::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    frame.render_widget(
        Paragraph::new(app.search.as_str())
            .style(search_style)
            .block(Block::default().borders(Borders::ALL).title("Search name or role (/)")),
        rows[0],
    );

    let users = filter_users(&state.users, &app.search);
    let table_rows: Vec<Row<'_>> = users
        .iter()
        .map(|user| {
            let status_color = match user.status {
                UserStatus::Active => Color::Green,
                UserStatus::Inactive => Color::DarkGray,
            };
            Row::new(vec![
                Cell::from(user.id.to_string()),
                Cell::from(user.name.clone()),
                Cell::from(user.role.to_string()),
                Cell::from(Span::styled(user.status.to_string(), Style::default().fg(status_color))),
                Cell::from(user.last_login.format("%Y-%m-%d %H:%M").to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(35),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Min(16),
        ],
    )
    .header(header_row(["ID", "Name", "Role", "Status", "Last Login"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Users ({} of {})", users.len(), state.users.len())),
    );
    frame.render_widget(table, rows[1]);

    render_insight(frame, insight_area, app);
}

fn render_resources(frame: &mut Frame<'_>, area: Rect, app: &App, state: &SessionState) {
    let (main, insight_area) = split_for_insight(area, app);

    let table_rows: Vec<Row<'_>> = state
        .resources
        .iter()
        .map(|resource| {
            Row::new(vec![
                Cell::from(resource.name.clone()),
                Cell::from(resource.kind.to_string()),
                Cell::from(resource.status.to_string()),
                Cell::from(Span::styled(
                    format!("{:>3}%", resource.usage),
                    Style::default().fg(band_color(usage_band(resource.usage))),
                )),
            ])
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Percentage(45),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(6),
        ],
    )
    .header(header_row(["Name", "Type", "Status", "Usage"]))
    .block(Block::default().borders(Borders::ALL).title("Resources"));
    frame.render_widget(table, main);

    render_insight(frame, insight_area, app);
}

fn render_activity(frame: &mut Frame<'_>, area: Rect, app: &App, state: &SessionState) {
    let (main, insight_area) = split_for_insight(area, app);

    let items: Vec<ListItem<'_>> = filter_logs(&state.logs, app.log_filter)
        .into_iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", entry.timestamp.format("%H:%M:%S"))),
                Span::styled(
                    format!("{:<8} ", entry.level.to_string()),
                    Style::default().fg(level_color(entry.level)),
                ),
                Span::raw(entry.message.clone()),
            ]))
        })
        .collect();

    frame.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Activity Log [filter: {}]", app.log_filter)),
        ),
        main,
    );

    render_insight(frame, insight_area, app);
}

fn render_chat(frame: &mut Frame<'_>, area: Rect, app: &App, state: &SessionState) {
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let block = Block::default().borders(Borders::ALL).title("AI Assistant");
    let inner = block.inner(split[0]);
    let width = usize::from(inner.width);

    let mut lines: Vec<Line<'_>> = Vec::new();
    for turn in &state.transcript {
        let (prefix, color) = if turn.is_user() {
            ("you> ", Color::Yellow)
        } else {
            ("ai> ", Color::Cyan)
        };
        let prefix_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
        for (i, row) in wrap_text(&format!("{}{}", prefix, turn.text), width).into_iter().enumerate() {
            match row.strip_prefix(prefix) {
                Some(rest) if i == 0 => lines.push(Line::from(vec![
                    Span::styled(prefix, prefix_style),
                    Span::raw(rest.to_string()),
                ])),
                _ => lines.push(Line::raw(row)),
            }
        }
    }
    if state.assistant_busy {
        lines.push(Line::from(Span::styled(
            "ai> thinking...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Rows are pre-wrapped, so skipping by row keeps the newest turn in view
    let skip = lines.len().saturating_sub(usize::from(inner.height).max(1));
    let transcript = Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>()).block(block);
    frame.render_widget(transcript, split[0]);

    let (title, style) = match (app.focus, state.assistant_busy) {
        (_, true) => ("Waiting for reply", Style::default().fg(Color::DarkGray)),
        (Focus::Chat, false) => ("Ask (Enter send, Esc leave)", Style::default().fg(Color::Yellow)),
        _ => ("Press C to chat", Style::default()),
    };
    frame.render_widget(
        Paragraph::new(app.prompt.as_str())
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(title)),
        split[1],
    );
}

/// Greedy word wrap to `width` columns; words longer than a row are split
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut row = String::new();
        let mut row_len = 0;
        for word in paragraph.split(' ') {
            let word_len = word.chars().count();
            if row_len > 0 && row_len + 1 + word_len > width {
                rows.push(std::mem::take(&mut row));
                row_len = 0;
            }
            if row_len > 0 {
                row.push(' ');
                row_len += 1;
            }
            for c in word.chars() {
                if row_len == width {
                    rows.push(std::mem::take(&mut row));
                    row_len = 0;
                }
                row.push(c);
                row_len += 1;
            }
        }
        rows.push(row);
    }
    rows
}

fn render_insight(frame: &mut Frame<'_>, area: Option<Rect>, app: &App) {
    let (Some(area), Some(panel)) = (area, app.visible_insight()) else {
        return;
    };

    let (title, text) = match panel {
        InsightPanel::Pending(kind) => (kind.title(), "Analyzing...".to_string()),
        InsightPanel::Ready(kind, text) => (kind.title(), text.clone()),
    };
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(format!("AI {} (Esc close)", title))),
        area,
    );
}

fn split_for_insight(area: Rect, app: &App) -> (Rect, Option<Rect>) {
    if app.visible_insight().is_none() {
        return (area, None);
    }
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    (split[0], Some(split[1]))
}

fn header_row<const N: usize>(titles: [&'static str; N]) -> Row<'static> {
    Row::new(titles).style(Style::default().add_modifier(Modifier::BOLD))
}

fn band_color(band: UsageBand) -> Color {
    match band {
        UsageBand::Critical => Color::Red,
        UsageBand::Elevated => Color::Yellow,
        UsageBand::Normal => Color::Green,
    }
}

fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Info => Color::Blue,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Error => Color::Red,
        LogLevel::Critical => Color::LightRed,
    }
}

fn notification_color(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Success => Color::Green,
        NotificationLevel::Warning => Color::Yellow,
        NotificationLevel::Critical => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render_to_text(app: &App, state: &SessionState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal
            .draw(|frame| draw_ui(frame, app, state, ProviderKind::Disabled))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_dashboard_renders_stats_and_greeting() {
        let state = SessionState::seeded(10);
        let text = render_to_text(&App::new(), &state);

        assert!(text.contains("99.98%"));
        assert!(text.contains("Database Backup"));
        assert!(text.contains("Hello! How can I help"));
    }

    #[test]
    fn test_users_view_applies_search() {
        let state = SessionState::seeded(10);
        let mut app = App::new();
        app.view = View::Users;
        app.search = "bob".to_string();

        let text = render_to_text(&app, &state);

        assert!(text.contains("Viewer Bob"));
        assert!(!text.contains("Operator Jane"));
    }

    #[test]
    fn test_chat_keeps_newest_reply_visible_after_long_turns() {
        let mut state = SessionState::seeded(10);
        let long_reply = "All services are operational and the nightly backup finished on schedule. ".repeat(6);
        for _ in 0..3 {
            state.transcript.push(ChatTurn::user("How is the cluster doing today?"));
            state.transcript.push(ChatTurn::assistant(long_reply.trim_end()));
        }
        state.transcript.push(ChatTurn::assistant("Newest reply: LATEST-REPLY-MARKER"));

        let text = render_to_text(&App::new(), &state);

        assert!(text.contains("LATEST-REPLY-MARKER"));
    }

    #[test]
    fn test_wrap_text_rows() {
        assert_eq!(wrap_text("ai> hello there world", 11), vec!["ai> hello", "there world"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("one\ntwo", 10), vec!["one", "two"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_insight_panel_shows_on_its_view() {
        let state = SessionState::seeded(10);
        let mut app = App::new();
        app.view = View::Resources;
        app.insight = Some(InsightPanel::Pending(opsdeck_assistant::InsightKind::Resources));

        let text = render_to_text(&app, &state);

        assert!(text.contains("Analyzing..."));
        assert!(text.contains("GPU Render Node 1"));
    }
}
