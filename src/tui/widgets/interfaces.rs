//! Network interface table, sorted by name.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use crate::fmt::format_bytes;
use crate::model::{Probe, Snapshot};
use crate::tui::style::Styles;

/// Renders the interface table.
pub fn render_interfaces(frame: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
    let block = Block::default()
        .title(Span::styled(" Network Interfaces ", Styles::net()))
        .borders(Borders::ALL)
        .border_style(Styles::dim());

    let Some(snapshot) = snapshot else {
        frame.render_widget(block, area);
        return;
    };
    if !snapshot.is_available(Probe::InterfaceAddresses) {
        let text = Paragraph::new(Span::styled("unavailable", Styles::dim())).block(block);
        frame.render_widget(text, area);
        return;
    }

    let counters = snapshot.is_available(Probe::InterfaceCounters);
    let header = Row::new(["IFACE", "IPV4", "IPV6", "RX", "TX"]).style(Styles::table_header());
    let rows = snapshot.interfaces.iter().map(|(name, iface)| {
        let (rx, tx) = if counters {
            (format_bytes(iface.rx_bytes), format_bytes(iface.tx_bytes))
        } else {
            ("-".to_string(), "-".to_string())
        };
        Row::new([
            name.clone(),
            iface.ipv4.clone(),
            iface.ipv6.clone(),
            rx,
            tx,
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(20),
            Constraint::Min(28),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}
