//! Production command runner over the system OpenSSH client.
//!
//! One master connection is opened up front; every probe command reuses it
//! through OpenSSH connection multiplexing.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::collector::traits::{CommandRunner, RunError};
use crate::target::RemoteTarget;

/// Connection settings that do not come from the target argument.
#[derive(Debug, Clone)]
pub struct SshOptions {
    /// ssh client to execute.
    pub program: PathBuf,
    pub identity: Option<PathBuf>,
    /// Seconds to wait for the TCP connection and handshake.
    pub connect_timeout: u64,
}

impl Default for SshOptions {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ssh"),
            identity: None,
            connect_timeout: 10,
        }
    }
}

/// Runs commands on the target through a multiplexed ssh connection.
pub struct SshRunner {
    target: RemoteTarget,
    options: SshOptions,
    /// Holds the control socket; removed on drop.
    control_dir: TempDir,
    closed: AtomicBool,
}

impl SshRunner {
    /// Opens the master connection.
    ///
    /// Runs in the foreground with the terminal attached so password,
    /// passphrase and host key prompts reach the user. Returns once the
    /// session is authenticated and the master has moved to the background.
    pub fn connect(target: RemoteTarget, options: SshOptions) -> Result<Self, RunError> {
        let runner = Self::prepare(target, options).map_err(|source| RunError::Spawn {
            program: "control directory".to_string(),
            source,
        })?;

        info!(target = %runner.target, "opening ssh connection");
        let status = Command::new(&runner.options.program)
            .args(runner.master_args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| runner.spawn_error(source))?;

        if !status.success() {
            // Nothing to tear down.
            runner.closed.store(true, Ordering::Relaxed);
            return Err(RunError::Exit {
                code: status.code(),
                stderr: String::new(),
            });
        }

        info!(target = %runner.target, "ssh connection established");
        Ok(runner)
    }

    fn prepare(target: RemoteTarget, options: SshOptions) -> io::Result<Self> {
        let control_dir = tempfile::Builder::new().prefix("remtop-").tempdir()?;
        Ok(Self {
            target,
            options,
            control_dir,
            closed: AtomicBool::new(false),
        })
    }

    pub fn target(&self) -> &RemoteTarget {
        &self.target
    }

    fn control_path(&self) -> PathBuf {
        self.control_dir.path().join("master")
    }

    fn spawn_error(&self, source: io::Error) -> RunError {
        RunError::Spawn {
            program: self.options.program.display().to_string(),
            source,
        }
    }

    /// Arguments shared by every invocation, up to and including the host.
    fn common_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let mut option = |value: String| {
            args.push("-o".into());
            args.push(value.into());
        };

        option(format!("ControlPath={}", self.control_path().display()));
        option(format!("ConnectTimeout={}", self.options.connect_timeout));

        if let Some(port) = self.target.port {
            args.push("-p".into());
            args.push(port.to_string().into());
        }
        if let Some(user) = &self.target.user {
            args.push("-l".into());
            args.push(user.into());
        }
        if let Some(identity) = &self.options.identity {
            args.push("-i".into());
            args.push(identity.into());
        }
        args
    }

    fn master_args(&self) -> Vec<OsString> {
        let mut args = self.common_args();
        for value in ["ControlMaster=yes", "ControlPersist=yes"] {
            args.push("-o".into());
            args.push(value.into());
        }
        // Authenticate, then fork to the background without a remote command.
        args.push("-f".into());
        args.push("-N".into());
        args.push(self.target.host.clone().into());
        args
    }

    fn command_args(&self, command: &str) -> Vec<OsString> {
        let mut args = self.common_args();
        for value in ["ControlMaster=no", "BatchMode=yes"] {
            args.push("-o".into());
            args.push(value.into());
        }
        args.push("-T".into());
        args.push(self.target.host.clone().into());
        args.push("--".into());
        args.push(command.into());
        args
    }

    fn exit_args(&self) -> Vec<OsString> {
        let mut args = self.common_args();
        args.push("-O".into());
        args.push("exit".into());
        args.push(self.target.host.clone().into());
        args
    }

    /// Stops the master connection. Later commands fail as unavailable.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::Relaxed) {
            return;
        }

        let result = Command::new(&self.options.program)
            .args(self.exit_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match result {
            Ok(status) if status.success() => info!(target = %self.target, "ssh connection closed"),
            Ok(status) => warn!(target = %self.target, %status, "ssh master did not exit cleanly"),
            Err(e) => warn!(target = %self.target, error = %e, "failed to stop ssh master"),
        }
    }

    /// Path of the control socket, for diagnostics.
    pub fn control_socket(&self) -> PathBuf {
        self.control_path()
    }
}

impl CommandRunner for SshRunner {
    fn run(&self, command: &str) -> Result<String, RunError> {
        if self.closed.load(Ordering::Relaxed) {
            return Err(RunError::Unavailable("ssh connection closed".to_string()));
        }

        debug!(command, "running remote command");
        let output = Command::new(&self.options.program)
            .args(self.command_args(command))
            .stdin(Stdio::null())
            .output()
            .map_err(|source| self.spawn_error(source))?;

        if !output.status.success() {
            return Err(RunError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Drop for SshRunner {
    fn drop(&mut self) {
        self.close();
    }
}
