//! TUI widgets.

mod filesystems;
mod header;
mod help;
mod interfaces;
mod summary;

pub use filesystems::{filesystems_height, render_filesystems};
pub use header::render_header;
pub use help::render_help;
pub use interfaces::render_interfaces;
pub use summary::{SUMMARY_HEIGHT, render_summary};

/// Share of `part` in `total`, in percent; zero for an empty total.
pub(crate) fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
