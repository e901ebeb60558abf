//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::state::AppState;
use super::style::Styles;
use super::widgets::{
    SUMMARY_HEIGHT, filesystems_height, render_filesystems, render_header, render_help,
    render_interfaces, render_summary,
};

/// Main render function.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let snapshot = state.snapshot.as_ref();

    let chunks = Layout::vertical([
        Constraint::Length(1),                             // Header
        Constraint::Length(SUMMARY_HEIGHT),                // CPL, CPU, MEM, SWP
        Constraint::Length(filesystems_height(snapshot)),  // Filesystems
        Constraint::Min(4),                                // Interfaces
        Constraint::Length(1),                             // Footer
    ])
    .split(area);

    render_header(frame, chunks[0], state);
    render_summary(frame, chunks[1], snapshot);
    render_filesystems(frame, chunks[2], snapshot);
    render_interfaces(frame, chunks[3], snapshot);
    render_footer(frame, chunks[4], state);

    // Rendered last to overlay everything
    if state.show_help {
        render_help(frame, area);
    }
}

/// Key hints, or the probes that failed in the last round.
fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let failed: Vec<&str> = state
        .snapshot
        .as_ref()
        .map(|s| s.unavailable().map(|p| p.name()).collect())
        .unwrap_or_default();

    let line = if failed.is_empty() {
        Line::from(vec![
            Span::styled("q", Styles::help_key()),
            Span::styled(" quit  ", Styles::dim()),
            Span::styled("r", Styles::help_key()),
            Span::styled(" refresh  ", Styles::dim()),
            Span::styled("p", Styles::help_key()),
            Span::styled(" pause  ", Styles::dim()),
            Span::styled("?", Styles::help_key()),
            Span::styled(" help", Styles::dim()),
        ])
    } else {
        Line::from(Span::styled(
            format!("unavailable: {}", failed.join(", ")),
            Styles::warning(),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}
