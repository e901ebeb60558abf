//! Mock command runner for testing.
//!
//! This module provides `MockRunner` and pre-built host scenarios for testing
//! the collector without an ssh connection.

mod runner;
mod scenarios;

pub use runner::MockRunner;
