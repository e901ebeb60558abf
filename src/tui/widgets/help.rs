//! Help popup listing the key bindings.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::style::Styles;

const KEYS: &[(&str, &str)] = &[
    ("q, Esc", "quit"),
    ("Ctrl-C", "quit"),
    ("r", "refresh now"),
    ("p, Space", "pause or resume refreshing"),
    ("?, h", "toggle this help"),
];

/// Renders the help popup centered on screen.
pub fn render_help(frame: &mut Frame, area: Rect) {
    let popup_width = (area.width * 50 / 100).clamp(40, 60).min(area.width);
    let popup_height = (KEYS.len() as u16 + 4).min(area.height);

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(area.x + popup_x, area.y + popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut content: Vec<Line> = KEYS
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{:>10}", key), Styles::help_key()),
                Span::raw("  "),
                Span::raw(*action),
            ])
        })
        .collect();
    content.push(Line::from(""));
    content.push(Line::from(Span::styled("any key closes", Styles::dim())));

    frame.render_widget(Paragraph::new(content).block(block), popup_area);
}
