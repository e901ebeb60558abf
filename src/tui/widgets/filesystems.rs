//! Filesystem usage table.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::fmt::format_bytes;
use crate::model::{Probe, Snapshot};
use crate::tui::style::Styles;

use super::percent;

/// Height needed to show every filesystem: borders, header and one row each.
pub fn filesystems_height(snapshot: Option<&Snapshot>) -> u16 {
    let rows = snapshot.map_or(0, |s| s.filesystems.len()).max(1);
    rows.min(u16::MAX as usize - 3) as u16 + 3
}

/// Renders the filesystem table.
pub fn render_filesystems(frame: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
    let block = Block::default()
        .title(Span::styled(" Filesystems ", Styles::disk()))
        .borders(Borders::ALL)
        .border_style(Styles::dim());

    let Some(snapshot) = snapshot else {
        frame.render_widget(block, area);
        return;
    };
    if !snapshot.is_available(Probe::Filesystems) {
        let text = Paragraph::new(Span::styled("unavailable", Styles::dim())).block(block);
        frame.render_widget(text, area);
        return;
    }

    let header = Row::new(["MOUNT", "SIZE", "USED", "FREE", "USE%"]).style(Styles::table_header());
    let rows = snapshot.filesystems.iter().map(|fs| {
        let pct = percent(fs.used, fs.size());
        Row::new([
            Cell::from(fs.mount_point.clone()),
            Cell::from(format_bytes(fs.size())),
            Cell::from(format_bytes(fs.used)),
            Cell::from(format_bytes(fs.free)),
            Cell::from(format!("{:5.1}%", pct)).style(Styles::for_percent(pct)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilesystemEntry;

    #[test]
    fn test_filesystems_height() {
        assert_eq!(filesystems_height(None), 4);

        let snapshot = Snapshot {
            filesystems: vec![FilesystemEntry::default(); 3],
            ..Snapshot::default()
        };
        assert_eq!(filesystems_height(Some(&snapshot)), 6);
    }
}
