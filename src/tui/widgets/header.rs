//! Header widget showing time, target, state and round timing.

use chrono::{DateTime, Local, TimeZone};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use crate::fmt::format_uptime;
use crate::tui::state::AppState;
use crate::tui::style::Styles;

/// Renders the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::horizontal([
        Constraint::Length(21), // Time
        Constraint::Min(20),    // Host
        Constraint::Length(10), // Mode
        Constraint::Length(18), // Round time
    ])
    .split(area);

    let timestamp = state
        .snapshot
        .as_ref()
        .map(|s| s.timestamp)
        .unwrap_or_else(|| Local::now().timestamp());
    let time_str = Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|dt: DateTime<Local>| dt.format(" %Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| " ----".to_string());
    frame.render_widget(Paragraph::new(time_str).style(Styles::header()), chunks[0]);

    let host = match &state.snapshot {
        Some(s) if !s.hostname.is_empty() => {
            format!("{} up {}", s.hostname, format_uptime(s.uptime))
        }
        Some(_) => state.target.clone(),
        None => format!("{} (connecting)", state.target),
    };
    frame.render_widget(Paragraph::new(host).style(Styles::header()), chunks[1]);

    let mode = if state.paused { " PAUSED " } else { " LIVE " };
    frame.render_widget(Paragraph::new(mode).style(Styles::header()), chunks[2]);

    let round = state
        .timing
        .as_ref()
        .map(|t| format!("round {} ms ", t.total.as_millis()))
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(round)
            .style(Styles::header())
            .alignment(ratatui::layout::Alignment::Right),
        chunks[3],
    );
}
