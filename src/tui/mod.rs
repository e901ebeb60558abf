//! Terminal User Interface for remtop.
//!
//! Full-screen, top-like view of the latest snapshot of one host, refreshed
//! every interval.

mod app;
mod event;
mod input;
mod render;
mod state;
mod style;
mod widgets;

pub use app::App;
pub use state::AppState;
