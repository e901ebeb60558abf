//! Application state management.

use crate::collector::CollectorTiming;
use crate::model::Snapshot;

/// What the view shows and how it behaves.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Target as typed on the command line, shown in the header.
    pub target: String,
    /// Latest snapshot; `None` until the first round completes.
    pub snapshot: Option<Snapshot>,
    /// Timing of the round that produced `snapshot`.
    pub timing: Option<CollectorTiming>,
    /// Completed rounds.
    pub rounds: u64,
    /// Ticks no longer start rounds; `r` still does.
    pub paused: bool,
    pub show_help: bool,
}

impl AppState {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Stores the result of a finished round.
    pub fn apply(&mut self, snapshot: Snapshot, timing: Option<CollectorTiming>) {
        self.snapshot = Some(snapshot);
        self.timing = timing;
        self.rounds += 1;
    }
}
