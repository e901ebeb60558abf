//! Main collector that runs every probe against one host.
//!
//! The `Collector` struct owns the command runner and the CPU state carried
//! between rounds, and assembles the probe results into a `Snapshot`.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::collector::cpu::CpuTracker;
use crate::collector::probes::CollectError;
use crate::collector::probes::system::{
    collect_cpu_sample, collect_filesystems, collect_hostname, collect_interface_addresses,
    collect_interface_counters, collect_load, collect_memory, collect_uptime,
};
use crate::collector::traits::CommandRunner;
use crate::model::{Probe, ProbeFailure, Snapshot};

/// Timing information for each probe of a round.
///
/// Each probe is one remote round trip, so these are mostly network latency.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    /// Total snapshot collection time.
    pub total: Duration,
    pub uptime: Duration,
    pub hostname: Duration,
    pub load: Duration,
    pub memory: Duration,
    pub filesystems: Duration,
    /// Includes the fallback location when the first one fails.
    pub interface_addresses: Duration,
    pub interface_counters: Duration,
    pub cpu: Duration,
}

impl CollectorTiming {
    /// Returns the time spent in `probe`.
    pub fn probe(&self, probe: Probe) -> Duration {
        match probe {
            Probe::Uptime => self.uptime,
            Probe::Hostname => self.hostname,
            Probe::Load => self.load,
            Probe::Memory => self.memory,
            Probe::Filesystems => self.filesystems,
            Probe::InterfaceAddresses => self.interface_addresses,
            Probe::InterfaceCounters => self.interface_counters,
            Probe::Cpu => self.cpu,
        }
    }

    fn probe_mut(&mut self, probe: Probe) -> &mut Duration {
        match probe {
            Probe::Uptime => &mut self.uptime,
            Probe::Hostname => &mut self.hostname,
            Probe::Load => &mut self.load,
            Probe::Memory => &mut self.memory,
            Probe::Filesystems => &mut self.filesystems,
            Probe::InterfaceAddresses => &mut self.interface_addresses,
            Probe::InterfaceCounters => &mut self.interface_counters,
            Probe::Cpu => &mut self.cpu,
        }
    }
}

/// Main collector that gathers a snapshot of one host.
///
/// Every round runs the probes in a fixed order. A failing probe leaves its
/// section at the default value and is listed in `Snapshot::failures`; it
/// never stops the remaining probes.
pub struct Collector<R: CommandRunner> {
    runner: R,
    cpu: CpuTracker,
    last_timing: Option<CollectorTiming>,
}

impl<R: CommandRunner> Collector<R> {
    /// Creates a new collector with a cold CPU state.
    ///
    /// # Arguments
    /// * `runner` - Command runner (ssh or mock)
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            cpu: CpuTracker::new(),
            last_timing: None,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn cpu_tracker(&self) -> &CpuTracker {
        &self.cpu
    }

    /// Returns timing information from the last collection.
    pub fn last_timing(&self) -> Option<&CollectorTiming> {
        self.last_timing.as_ref()
    }

    /// Collects one snapshot.
    ///
    /// CPU usage is `None` on the first successful round, since it needs a
    /// previous sample.
    pub fn collect_snapshot(&mut self) -> Snapshot {
        let total_start = Instant::now();
        let mut timing = CollectorTiming::default();
        let mut snapshot = Snapshot {
            timestamp: chrono::Utc::now().timestamp(),
            ..Snapshot::default()
        };

        let runner = &self.runner;

        timed(&mut timing, Probe::Uptime, &mut snapshot, |s| {
            s.uptime = collect_uptime(runner)?;
            Ok(())
        });
        timed(&mut timing, Probe::Hostname, &mut snapshot, |s| {
            s.hostname = collect_hostname(runner)?;
            Ok(())
        });
        timed(&mut timing, Probe::Load, &mut snapshot, |s| {
            s.load = collect_load(runner)?;
            Ok(())
        });
        timed(&mut timing, Probe::Memory, &mut snapshot, |s| {
            s.memory = collect_memory(runner)?;
            Ok(())
        });
        timed(&mut timing, Probe::Filesystems, &mut snapshot, |s| {
            s.filesystems = collect_filesystems(runner)?;
            Ok(())
        });
        timed(&mut timing, Probe::InterfaceAddresses, &mut snapshot, |s| {
            collect_interface_addresses(runner, &mut s.interfaces)
        });
        timed(&mut timing, Probe::InterfaceCounters, &mut snapshot, |s| {
            collect_interface_counters(runner, &mut s.interfaces)
        });

        let cpu = &mut self.cpu;
        timed(&mut timing, Probe::Cpu, &mut snapshot, |s| {
            // A transport failure keeps the previous sample; the next good
            // round still measures from it.
            match collect_cpu_sample(runner)? {
                Ok(sample) => {
                    s.cpu = cpu.advance(sample);
                    Ok(())
                }
                Err(e) => {
                    cpu.reset();
                    Err(e.into())
                }
            }
        });

        timing.total = total_start.elapsed();
        debug!(
            total_ms = timing.total.as_millis() as u64,
            failures = snapshot.failures.len(),
            "snapshot collected"
        );
        if snapshot.failures.len() == Probe::ALL.len() {
            warn!("every probe failed, host unreachable?");
        }
        self.last_timing = Some(timing);

        snapshot
    }
}

/// Runs one probe, records its duration and, on error, its failure.
fn timed<F>(timing: &mut CollectorTiming, probe: Probe, snapshot: &mut Snapshot, f: F)
where
    F: FnOnce(&mut Snapshot) -> Result<(), CollectError>,
{
    let start = Instant::now();
    let result = f(snapshot);
    let elapsed = start.elapsed();
    *timing.probe_mut(probe) = elapsed;
    trace!(%probe, elapsed_us = elapsed.as_micros() as u64, "probe finished");

    if let Err(e) = result {
        debug!(%probe, error = %e, "probe failed");
        snapshot.failures.push(ProbeFailure {
            probe,
            error: e.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockRunner;
    use crate::collector::probes::commands;

    #[test]
    fn test_collect_snapshot() {
        let mut collector = Collector::new(MockRunner::typical_host());

        let snapshot = collector.collect_snapshot();

        assert!(snapshot.failures.is_empty(), "{:?}", snapshot.failures);
        assert_eq!(snapshot.uptime.as_secs(), 350735);
        assert_eq!(snapshot.hostname, "web-01.example.com");
        assert_eq!(snapshot.load.load1, "0.15");
        assert_eq!(snapshot.load.running_procs, "1");
        assert_eq!(snapshot.load.total_procs, "150");
        assert_eq!(snapshot.memory.total, 16384000u64 * 1024);
        assert_eq!(snapshot.filesystems.len(), 2);
        assert_eq!(snapshot.filesystems[0].mount_point, "/");
        assert_eq!(snapshot.filesystems[1].mount_point, "/data");
        assert!(snapshot.timestamp > 0);

        let eth0 = &snapshot.interfaces["eth0"];
        assert_eq!(eth0.ipv4, "10.0.0.5/24");
        assert_eq!(eth0.rx_bytes, 9876543);
        assert_eq!(eth0.tx_bytes, 87654321);
        assert!(!snapshot.interfaces.contains_key("docker0"));

        // Cold start
        assert!(snapshot.cpu.is_none());
    }

    #[test]
    fn test_cpu_on_second_round() {
        let mut collector = Collector::new(MockRunner::typical_host());

        collector.collect_snapshot();
        let snapshot = collector.collect_snapshot();

        let cpu = snapshot.cpu.unwrap();
        assert_eq!(cpu.user, 30.0);
        assert_eq!(cpu.system, 10.0);
        assert_eq!(cpu.idle, 55.0);
        assert_eq!(cpu.iowait, 5.0);

        // Same sample again: no ticks elapsed.
        let snapshot = collector.collect_snapshot();
        assert_eq!(snapshot.cpu.unwrap().user, 0.0);
    }

    #[test]
    fn test_probes_run_in_order() {
        let mut collector = Collector::new(MockRunner::typical_host());
        collector.collect_snapshot();

        assert_eq!(
            collector.runner().calls(),
            vec![
                commands::UPTIME,
                commands::HOSTNAME,
                commands::LOADAVG,
                commands::MEMINFO,
                commands::DF,
                commands::IP_ADDR[0],
                commands::NET_DEV,
                commands::STAT,
            ]
        );
    }

    #[test]
    fn test_ip_fallback() {
        let mut collector = Collector::new(MockRunner::legacy_host());

        let snapshot = collector.collect_snapshot();

        assert!(snapshot.is_available(Probe::InterfaceAddresses));
        assert_eq!(snapshot.interfaces["eth0"].ipv4, "10.0.0.5/24");
        assert_eq!(snapshot.filesystems.len(), 2);
        assert_eq!(snapshot.filesystems[1].mount_point, "/home");
        assert_eq!(snapshot.filesystems[1].used, 88190287872);
        assert!(collector.runner().calls().contains(&commands::IP_ADDR[1].to_string()));
    }

    #[test]
    fn test_failing_probes_do_not_abort_round() {
        let mut collector = Collector::new(MockRunner::degraded_host());

        let snapshot = collector.collect_snapshot();

        let failed: Vec<Probe> = snapshot.unavailable().collect();
        assert_eq!(
            failed,
            vec![Probe::Filesystems, Probe::InterfaceCounters, Probe::Cpu]
        );
        assert!(snapshot.filesystems.is_empty());
        assert_eq!(snapshot.hostname, "web-01.example.com");
        assert_eq!(snapshot.interfaces["eth0"].rx_bytes, 0);
        assert!(snapshot.failures[0].error.contains("Stale file handle"));
        assert!(!collector.cpu_tracker().is_warm());
    }

    #[test]
    fn test_unreachable_host() {
        let mut collector = Collector::new(MockRunner::new());

        let snapshot = collector.collect_snapshot();

        assert_eq!(snapshot.failures.len(), Probe::ALL.len());
        // Both ip locations were tried.
        assert_eq!(collector.runner().calls().len(), Probe::ALL.len() + 1);
    }

    #[test]
    fn test_cpu_transport_failure_keeps_previous_sample() {
        let mut runner = MockRunner::typical_host();
        runner.remove(commands::STAT);
        runner.add_output(commands::STAT, "cpu  100 0 0 900 0 0 0 0 0 0\n");
        runner.add_failure(commands::STAT, 255, "Connection reset");
        let mut collector = Collector::new(runner);

        collector.collect_snapshot();
        let snapshot = collector.collect_snapshot();

        assert!(!snapshot.is_available(Probe::Cpu));
        assert!(snapshot.cpu.is_none());
        assert!(collector.cpu_tracker().is_warm());
        assert_eq!(collector.cpu_tracker().previous().total, 1000);
    }

    #[test]
    fn test_cpu_parse_failure_resets() {
        let mut runner = MockRunner::typical_host();
        runner.remove(commands::STAT);
        runner.add_output(commands::STAT, "cpu  100 0 0 900 0 0 0 0 0 0\n");
        runner.add_output(commands::STAT, "ctxt 1\n");
        runner.add_output(commands::STAT, "cpu  200 0 0 1800 0 0 0 0 0 0\n");
        let mut collector = Collector::new(runner);

        collector.collect_snapshot();
        let snapshot = collector.collect_snapshot();
        assert!(!snapshot.is_available(Probe::Cpu));
        assert!(!collector.cpu_tracker().is_warm());

        // Cold again after the reset.
        let snapshot = collector.collect_snapshot();
        assert!(snapshot.is_available(Probe::Cpu));
        assert!(snapshot.cpu.is_none());
    }

    #[test]
    fn test_timing() {
        let mut collector = Collector::new(MockRunner::typical_host());
        assert!(collector.last_timing().is_none());

        collector.collect_snapshot();

        let timing = collector.last_timing().unwrap();
        for probe in Probe::ALL {
            assert!(timing.probe(probe) <= timing.total);
        }
    }
}
