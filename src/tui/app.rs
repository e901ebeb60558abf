//! Main TUI application.

use std::io;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::debug;

use crate::collector::{Collector, CommandRunner};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::AppState;

/// Main TUI application.
///
/// Owns the collector; rounds run on the UI thread between draws, so they
/// never overlap.
pub struct App<R: CommandRunner> {
    collector: Collector<R>,
    state: AppState,
    should_quit: bool,
}

impl<R: CommandRunner> App<R> {
    /// Creates a new App around a connected collector.
    pub fn new(collector: Collector<R>, target: impl Into<String>) -> Self {
        Self {
            collector,
            state: AppState::new(target),
            should_quit: false,
        }
    }

    /// Runs the TUI application until the user quits.
    pub fn run(mut self, tick_rate: Duration) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = first_error([
                    disable_raw_mode(),
                    execute!(io::stdout(), LeaveAlternateScreen),
                ]);
                return Err(e);
            }
        };

        let result = self.event_loop(&mut terminal, tick_rate);

        // Restore terminal even if the loop failed; every step runs.
        let restored = first_error([
            disable_raw_mode(),
            execute!(terminal.backend_mut(), LeaveAlternateScreen),
            terminal.show_cursor(),
        ]);

        result.and(restored)
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let events = EventHandler::new(tick_rate);

        // Show the frame before the first round, which may take a while.
        terminal.draw(|frame| render(frame, &self.state))?;
        self.refresh();

        loop {
            terminal.draw(|frame| render(frame, &self.state))?;

            match events.next() {
                Ok(Event::Tick) => {
                    if !self.state.paused {
                        self.refresh();
                    }
                }
                Ok(Event::Key(key)) => match handle_key(&mut self.state, key) {
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::Refresh => self.refresh(),
                    KeyAction::None => {}
                },
                Ok(Event::Resize) => {}
                Err(_) => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Collects one round and shows it.
    fn refresh(&mut self) {
        let snapshot = self.collector.collect_snapshot();
        let timing = self.collector.last_timing().cloned();
        debug!(round = self.state.rounds + 1, "round displayed");
        self.state.apply(snapshot, timing);
    }
}

/// Returns the first error among already completed steps.
fn first_error(results: impl IntoIterator<Item = io::Result<()>>) -> io::Result<()> {
    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_runs_every_step() {
        let mut ran = Vec::new();
        let mut step = |name: &'static str, fail: bool| {
            ran.push(name);
            if fail {
                Err(io::Error::other(name))
            } else {
                Ok(())
            }
        };

        let result = first_error([
            step("raw mode", true),
            step("alternate screen", true),
            step("cursor", false),
        ]);

        assert_eq!(result.unwrap_err().to_string(), "raw mode");
        assert_eq!(ran, vec!["raw mode", "alternate screen", "cursor"]);
    }

    #[test]
    fn test_restore_ok() {
        assert!(first_error([Ok(()), Ok(())]).is_ok());
    }
}
