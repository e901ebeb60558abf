//! Color scheme and styles (top-style).

use ratatui::style::{Color, Modifier, Style};

/// Color palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;

    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    pub const HIGHLIGHT_WARNING: Color = Color::Yellow;
    pub const HIGHLIGHT_CRITICAL: Color = Color::Red;

    // Metrics colors
    pub const CPU_COLOR: Color = Color::Cyan;
    pub const MEM_COLOR: Color = Color::Magenta;
    pub const DISK_COLOR: Color = Color::Yellow;
    pub const NET_COLOR: Color = Color::Green;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Header bar style.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Table header style.
    pub fn table_header() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    /// Warning value style (yellow).
    pub fn warning() -> Style {
        Style::default().fg(Theme::HIGHLIGHT_WARNING)
    }

    /// Critical value style (red).
    pub fn critical() -> Style {
        Style::default()
            .fg(Theme::HIGHLIGHT_CRITICAL)
            .add_modifier(Modifier::BOLD)
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    pub fn cpu() -> Style {
        Style::default().fg(Theme::CPU_COLOR)
    }

    pub fn mem() -> Style {
        Style::default().fg(Theme::MEM_COLOR)
    }

    pub fn disk() -> Style {
        Style::default().fg(Theme::DISK_COLOR)
    }

    pub fn net() -> Style {
        Style::default().fg(Theme::NET_COLOR)
    }

    /// Help key style (highlighted keys in help line).
    pub fn help_key() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    /// Style for a utilization percentage: red above 90, yellow above 75.
    pub fn for_percent(pct: f64) -> Style {
        if pct > 90.0 {
            Self::critical()
        } else if pct > 75.0 {
            Self::warning()
        } else {
            Self::default()
        }
    }
}
