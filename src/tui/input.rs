//! Keyboard input handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::AppState;

/// What the application loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Collect a round now.
    Refresh,
}

/// Handles a key press, updating view state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if state.show_help {
        // Any key closes help; quit keys still quit.
        state.show_help = false;
        return match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            _ => KeyAction::None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Refresh,
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
            state.paused = !state.paused;
            KeyAction::None
        }
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => {
            state.show_help = true;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}
