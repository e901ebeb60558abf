//! In-memory command runner that replays canned output.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use crate::collector::traits::{CommandRunner, RunError};

#[derive(Debug, Clone)]
enum Response {
    Output(String),
    Failure { code: i32, stderr: String },
}

#[derive(Debug, Default)]
struct State {
    /// Responses per command line. The last one repeats forever.
    responses: HashMap<String, VecDeque<Response>>,
    /// Every command run, in order.
    calls: Vec<String>,
}

/// Command runner for testing.
///
/// Maps exact command lines to their output or to a failing exit status.
/// Commands without a response fail as unavailable.
#[derive(Debug, Default)]
pub struct MockRunner {
    state: Mutex<State>,
}

impl MockRunner {
    /// Creates a runner that knows no commands.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&mut self, command: String, response: Response) {
        self.state
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .responses
            .entry(command)
            .or_default()
            .push_back(response);
    }

    /// Queues `output` as the standard output of `command`.
    ///
    /// Queued responses are returned one per call; the last one keeps being
    /// returned once the others are used up.
    pub fn add_output(&mut self, command: impl Into<String>, output: impl Into<String>) {
        self.push(command.into(), Response::Output(output.into()));
    }

    /// Queues a non-zero exit of `command`.
    pub fn add_failure(&mut self, command: impl Into<String>, code: i32, stderr: impl Into<String>) {
        self.push(
            command.into(),
            Response::Failure {
                code,
                stderr: stderr.into(),
            },
        );
    }

    /// Forgets all responses of `command`.
    pub fn remove(&mut self, command: &str) {
        self.state
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .responses
            .remove(command);
    }

    /// Returns every command run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Forgets the recorded calls.
    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &str) -> Result<String, RunError> {
        let mut state = self.state();
        state.calls.push(command.to_string());

        let queue = state
            .responses
            .get_mut(command)
            .ok_or_else(|| RunError::Unavailable(format!("no response for '{}'", command)))?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        match response {
            Some(Response::Output(output)) => Ok(output),
            Some(Response::Failure { code, stderr }) => Err(RunError::Exit {
                code: Some(code),
                stderr,
            }),
            None => Err(RunError::Unavailable(format!("no response for '{}'", command))),
        }
    }
}
