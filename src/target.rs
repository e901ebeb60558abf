//! Parsing of the `[user@]host[:port]` target argument.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Error returned for a malformed target argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("empty user name before '@'")]
    EmptyUser,
    #[error("more than one '@' in target")]
    MultipleAt,
    #[error("empty host name")]
    EmptyHost,
    #[error("invalid port '{0}': expected a number from 1 to 65535")]
    InvalidPort(String),
}

/// The host to monitor.
///
/// User and port are optional; when absent, OpenSSH picks them from its
/// configuration or its defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub user: Option<String>,
    pub host: String,
    pub port: Option<u16>,
}

impl RemoteTarget {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            user: None,
            host: host.into(),
            port: None,
        }
    }
}

impl FromStr for RemoteTarget {
    type Err = TargetError;

    /// Accepts `host`, `user@host`, `host:port` and `user@host:port`.
    /// IPv6 addresses with a port are written in brackets (`[::1]:22`);
    /// a bare address with several colons is taken as a host without port.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user, rest) = match s.split_once('@') {
            Some(_) if s.matches('@').count() > 1 => return Err(TargetError::MultipleAt),
            Some(("", _)) => return Err(TargetError::EmptyUser),
            Some((user, rest)) => (Some(user.to_string()), rest),
            None => (None, s),
        };

        let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
            match bracketed.split_once(']') {
                Some((host, "")) => (host, None),
                Some((host, tail)) => match tail.strip_prefix(':') {
                    Some(port) => (host, Some(port)),
                    None => return Err(TargetError::InvalidPort(tail.to_string())),
                },
                None => return Err(TargetError::EmptyHost),
            }
        } else if rest.matches(':').count() == 1 {
            let (host, port) = rest.split_once(':').unwrap_or((rest, ""));
            (host, Some(port))
        } else {
            (rest, None)
        };

        if host.is_empty() {
            return Err(TargetError::EmptyHost);
        }

        let port = port
            .map(|p| match p.parse::<u16>() {
                Ok(0) | Err(_) => Err(TargetError::InvalidPort(p.to_string())),
                Ok(port) => Ok(port),
            })
            .transpose()?;

        Ok(Self {
            user,
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(user) = &self.user {
            write!(f, "{}@", user)?;
        }
        match self.port {
            Some(port) if self.host.contains(':') => write!(f, "[{}]:{}", self.host, port),
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(&self.host),
        }
    }
}

/// Expands a leading `~` to the home directory.
///
/// Paths without it, and all paths when the home directory is unknown, are
/// returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => &rest[1..],
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}
