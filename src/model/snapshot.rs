//! Snapshot of one collection round.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::system::{CpuPercentages, FilesystemEntry, LoadInfo, MemoryInfo, NetworkInterface};

/// The probes run in every round, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Probe {
    Uptime,
    Hostname,
    Load,
    Memory,
    Filesystems,
    InterfaceAddresses,
    InterfaceCounters,
    Cpu,
}

impl Probe {
    /// All probes in the order a round runs them.
    pub const ALL: [Probe; 8] = [
        Probe::Uptime,
        Probe::Hostname,
        Probe::Load,
        Probe::Memory,
        Probe::Filesystems,
        Probe::InterfaceAddresses,
        Probe::InterfaceCounters,
        Probe::Cpu,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Probe::Uptime => "uptime",
            Probe::Hostname => "hostname",
            Probe::Load => "load",
            Probe::Memory => "memory",
            Probe::Filesystems => "filesystems",
            Probe::InterfaceAddresses => "interface addresses",
            Probe::InterfaceCounters => "interface counters",
            Probe::Cpu => "cpu",
        }
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A probe that produced nothing this round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeFailure {
    pub probe: Probe,
    pub error: String,
}

/// Everything collected from the remote host in one round.
///
/// Fields belonging to a probe listed in `failures` keep their zero values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    /// Unix timestamp (seconds, UTC) at which the round started.
    pub timestamp: i64,
    pub uptime: Duration,
    pub hostname: String,
    pub load: LoadInfo,
    pub memory: MemoryInfo,
    /// Block-device filesystems in mount order.
    pub filesystems: Vec<FilesystemEntry>,
    pub interfaces: BTreeMap<String, NetworkInterface>,
    /// `None` until two CPU samples are available.
    pub cpu: Option<CpuPercentages>,
    pub failures: Vec<ProbeFailure>,
}

impl Snapshot {
    /// Returns false if the probe failed this round.
    pub fn is_available(&self, probe: Probe) -> bool {
        !self.failures.iter().any(|f| f.probe == probe)
    }

    /// Memory in use, excluding buffers and page cache.
    pub fn memory_used(&self) -> u64 {
        self.memory.used()
    }

    /// Failed probes in execution order.
    pub fn unavailable(&self) -> impl Iterator<Item = Probe> + '_ {
        self.failures.iter().map(|f| f.probe)
    }
}
