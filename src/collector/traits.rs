//! Abstraction over remote command execution to enable testing and mocking.
//!
//! The `CommandRunner` trait allows the collector to work with both a real
//! ssh connection and mock implementations that replay canned output.

use std::io;

use thiserror::Error;

/// Error returned when a command could not be run or exited unsuccessfully.
#[derive(Debug, Error)]
pub enum RunError {
    /// The local transport program could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The command ran but exited with a non-zero status.
    #[error("{}", describe_exit(.code, .stderr))]
    Exit { code: Option<i32>, stderr: String },
    /// The command is not available on this runner.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

fn describe_exit(code: &Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(code) => format!("exited with status {}", code),
        None => "killed by signal".to_string(),
    };
    match stderr.trim() {
        "" => status,
        stderr => format!("{}: {}", status, stderr),
    }
}

/// Runs a fixed shell command line on the monitored host.
///
/// Implementations return the captured standard output. Any error means the
/// probe behind the command is unavailable for the current round.
pub trait CommandRunner: Send + Sync {
    /// Runs `command` and returns its standard output as text.
    ///
    /// # Arguments
    /// * `command` - Complete command line, passed to the remote shell as is
    fn run(&self, command: &str) -> Result<String, RunError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &str) -> Result<String, RunError> {
        (**self).run(command)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, command: &str) -> Result<String, RunError> {
        (**self).run(command)
    }
}
