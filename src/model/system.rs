//! Typed host metrics as parsed from the remote command output.

use serde::Serialize;

/// Load averages and process counts from `/proc/loadavg`.
///
/// All values are kept exactly as the kernel printed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadInfo {
    pub load1: String,
    pub load5: String,
    pub load15: String,
    /// Currently runnable scheduling entities.
    pub running_procs: String,
    /// Total scheduling entities.
    pub total_procs: String,
}

/// Memory and swap totals from `/proc/meminfo`, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryInfo {
    pub total: u64,
    pub free: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

impl MemoryInfo {
    /// Memory not accounted for as free, buffers or page cache.
    pub fn used(&self) -> u64 {
        self.total
            .saturating_sub(self.free)
            .saturating_sub(self.buffers)
            .saturating_sub(self.cached)
    }
}

/// One mounted block-device filesystem from `df -B1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilesystemEntry {
    pub mount_point: String,
    pub used: u64,
    pub free: u64,
}

impl FilesystemEntry {
    pub fn size(&self) -> u64 {
        self.used.saturating_add(self.free)
    }
}

/// Addresses and cumulative byte counters of one network interface.
///
/// The interface name is the key of [`crate::model::Snapshot::interfaces`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkInterface {
    /// IPv4 address with prefix length, e.g. `10.0.0.1/24`. Empty if none.
    pub ipv4: String,
    /// IPv6 address with prefix length. Empty if none.
    pub ipv6: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Cumulative CPU time counters of the aggregate `cpu` line in `/proc/stat`.
///
/// Values are clock ticks since boot. `total` is the sum of the nine
/// counters; a zero total marks an empty sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RawCpuSample {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub total: u64,
}

impl RawCpuSample {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// CPU time breakdown over one refresh interval, in percent.
///
/// Steal time counts towards the interval length but is not reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CpuPercentages {
    pub user: f32,
    pub nice: f32,
    pub system: f32,
    pub idle: f32,
    pub iowait: f32,
    pub irq: f32,
    pub softirq: f32,
    pub guest: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_used() {
        let mem = MemoryInfo {
            total: 1000,
            free: 100,
            buffers: 50,
            cached: 250,
            ..MemoryInfo::default()
        };
        assert_eq!(mem.used(), 600);
    }

    #[test]
    fn test_memory_used_saturates() {
        // Partially parsed meminfo must not underflow.
        let mem = MemoryInfo {
            total: 0,
            free: 100,
            ..MemoryInfo::default()
        };
        assert_eq!(mem.used(), 0);
    }

    #[test]
    fn test_filesystem_size() {
        let fs = FilesystemEntry {
            mount_point: "/".to_string(),
            used: 40,
            free: 60,
        };
        assert_eq!(fs.size(), 100);
    }
}
