//! remtop - remote Linux system monitor over ssh.
//!
//! This library provides the pieces used by the `remtop` binary:
//! - `collector` - runs the probe commands on the host and assembles snapshots
//! - `model` - typed snapshot data
//! - `fmt` - plain text rendering
//! - `tui` - interactive full-screen view

pub mod collector;
pub mod fmt;
pub mod model;
pub mod target;
pub mod tui;
