//! Frame rendering for the login and chat screens.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::app::ui_state::{LoginField, Screen};
use crate::core::app::App;
use crate::core::session::AuthState;

/// Fixed pane heights used by both the renderer and the scroll math.
pub const CHART_PANE_HEIGHT: u16 = 9;
pub const STATUS_LINE_HEIGHT: u16 = 1;
pub const INPUT_AREA_HEIGHT: u16 = 3;

pub fn ui(f: &mut Frame, app: &App) {
    match app.ui.screen {
        Screen::Login => draw_login(f, app),
        Screen::Chat => draw_chat(f, app),
    }
}

/// Lines the transcript would occupy at full width (before wrapping).
pub fn transcript_line_count(app: &App) -> u16 {
    build_transcript_lines(app).len() as u16
}

/// How far the transcript can scroll inside a viewport of the given height.
pub fn max_scroll_offset(app: &App, viewport_height: u16) -> u16 {
    transcript_line_count(app).saturating_sub(viewport_height)
}

/// Transcript viewport height for a terminal of the given total height.
pub fn transcript_view_height(total_height: u16) -> u16 {
    total_height
        .saturating_sub(CHART_PANE_HEIGHT + STATUS_LINE_HEIGHT + INPUT_AREA_HEIGHT)
        .saturating_sub(1) // transcript title
}

fn draw_login(f: &mut Frame, app: &App) {
    let area = centered_box(f.area(), 46, 12);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" moodline v{} | sign in ", env!("CARGO_PKG_VERSION")));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let focused = Style::default().fg(Color::Yellow);
    let unfocused = Style::default();

    let username = Paragraph::new(app.ui.username_input.as_str())
        .block(Block::default().borders(Borders::ALL).title("Username"))
        .style(if app.ui.login_focus == LoginField::Username {
            focused
        } else {
            unfocused
        });
    f.render_widget(username, rows[0]);

    let masked: String = "*".repeat(app.ui.password_input.chars().count());
    let password = Paragraph::new(masked.as_str())
        .block(Block::default().borders(Borders::ALL).title("Password"))
        .style(if app.ui.login_focus == LoginField::Password {
            focused
        } else {
            unfocused
        });
    f.render_widget(password, rows[1]);

    let feedback = login_feedback(app);
    f.render_widget(
        Paragraph::new(feedback.0).style(Style::default().fg(feedback.1)),
        rows[2],
    );

    f.render_widget(
        Paragraph::new("Enter: log in • Ctrl+N: register • Ctrl+C: quit")
            .style(Style::default().fg(Color::DarkGray)),
        rows[3],
    );

    let (field_area, text) = match app.ui.login_focus {
        LoginField::Username => (rows[0], app.ui.username_input.as_str()),
        LoginField::Password => (rows[1], masked.as_str()),
    };
    f.set_cursor_position((
        field_area.x + 1 + UnicodeWidthStr::width(text) as u16,
        field_area.y + 1,
    ));
}

fn login_feedback(app: &App) -> (String, Color) {
    if let Some(status) = &app.ui.status {
        return (status.clone(), Color::Yellow);
    }
    match app.auth.state() {
        AuthState::Authenticating => ("Logging in...".to_string(), Color::DarkGray),
        AuthState::Failed(reason) => (format!("Login failed: {reason}"), Color::Red),
        _ => (String::new(), Color::Reset),
    }
}

fn draw_chat(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(CHART_PANE_HEIGHT),
            Constraint::Length(STATUS_LINE_HEIGHT),
            Constraint::Length(INPUT_AREA_HEIGHT),
        ])
        .split(f.area());

    draw_transcript(f, app, chunks[0]);
    draw_chart_pane(f, app, chunks[1]);
    draw_status(f, app, chunks[2]);
    draw_input(f, app, chunks[3]);
}

pub fn build_transcript_lines(app: &App) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for msg in app.conversation.messages() {
        if msg.is_user() {
            lines.push(Line::from(vec![
                Span::styled(
                    "You: ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(&msg.text, Style::default().fg(Color::Cyan)),
            ]));
        } else {
            for content_line in msg.text.lines() {
                lines.push(Line::from(Span::styled(
                    content_line,
                    Style::default().fg(Color::White),
                )));
            }
            if let Some(note) = msg.sentiment_note() {
                lines.push(Line::from(Span::styled(
                    note,
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        lines.push(Line::from(""));
    }
    lines
}

fn draw_transcript(f: &mut Frame, app: &App, area: Rect) {
    let lines = build_transcript_lines(app);
    let available_height = area.height.saturating_sub(1);
    let max_offset = (lines.len() as u16).saturating_sub(available_height);
    let scroll_offset = if app.ui.auto_scroll {
        max_offset
    } else {
        app.ui.scroll_offset.min(max_offset)
    };

    let title = format!(
        "moodline v{} • {} ({}) • Log: {}",
        env!("CARGO_PKG_VERSION"),
        app.language.display_name(),
        app.language,
        app.transcript.status_string()
    );

    let transcript = Paragraph::new(lines)
        .block(Block::default().title(title))
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, area);
}

fn draw_chart_pane(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Mood Trend");

    let Some(spec) = app.chart.surface().spec() else {
        let empty = Paragraph::new("No mood data yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let datasets = vec![Dataset::default()
        .name(spec.series_label)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&spec.data)];

    let x_max = (spec.data.len().saturating_sub(1)).max(1) as f64;
    let x_labels: Vec<Line> = match spec.labels.as_slice() {
        [] => Vec::new(),
        [only] => vec![Line::from(only.as_str())],
        [first, .., last] => vec![Line::from(first.as_str()), Line::from(last.as_str())],
    };

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(x_labels)
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds(spec.y_bounds)
                .labels(["-1.0", "0.0", "1.0"])
                .style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(chart, area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let status = app.ui.status.as_deref().unwrap_or("");
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Yellow)),
        area,
    );
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(app.ui.input.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(
            "Type your message (Enter: send • Ctrl+G: language • Ctrl+D: log out • Ctrl+C: quit)",
        ))
        .wrap(Wrap { trim: true });
    f.render_widget(input, area);

    f.set_cursor_position((
        area.x + 1 + UnicodeWidthStr::width(app.ui.input.as_str()) as u16,
        area.y + 1,
    ));
}

fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
