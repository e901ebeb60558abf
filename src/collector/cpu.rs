//! CPU usage from two consecutive `/proc/stat` samples.
//!
//! The kernel only exposes cumulative tick counters, so a usage breakdown
//! needs the previous sample. [`CpuTracker`] keeps it between rounds.

use tracing::debug;

use crate::model::{CpuPercentages, RawCpuSample};

/// Holds the CPU sample of the previous round.
///
/// Cold until the first sample is recorded. Every recorded sample replaces
/// the previous one, so percentages always cover the latest interval.
#[derive(Debug, Clone, Default)]
pub struct CpuTracker {
    previous: RawCpuSample,
}

impl CpuTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once a non-empty sample has been recorded.
    pub fn is_warm(&self) -> bool {
        !self.previous.is_empty()
    }

    /// The sample recorded by the last call to [`advance`](Self::advance).
    pub fn previous(&self) -> &RawCpuSample {
        &self.previous
    }

    /// Records `current` and returns usage since the previous sample.
    ///
    /// Returns `None` while cold.
    pub fn advance(&mut self, current: RawCpuSample) -> Option<CpuPercentages> {
        let usage = if self.is_warm() {
            Some(cpu_percentages(&self.previous, &current))
        } else {
            debug!("first cpu sample, usage available next round");
            None
        };
        self.previous = current;
        usage
    }

    /// Drops the previous sample.
    pub fn reset(&mut self) {
        self.previous = RawCpuSample::default();
    }
}

/// Computes the CPU time breakdown between two samples.
///
/// Each field is its tick delta over the total tick delta. A zero or negative
/// total delta (polling faster than the tick rate, or counters reset by a
/// reboot) yields all zeros.
pub fn cpu_percentages(previous: &RawCpuSample, current: &RawCpuSample) -> CpuPercentages {
    if current.total <= previous.total {
        return CpuPercentages::default();
    }
    let total = (current.total - previous.total) as f64;

    let pct = |now: u64, before: u64| -> f32 {
        (100.0 * now.saturating_sub(before) as f64 / total) as f32
    };

    CpuPercentages {
        user: pct(current.user, previous.user),
        nice: pct(current.nice, previous.nice),
        system: pct(current.system, previous.system),
        idle: pct(current.idle, previous.idle),
        iowait: pct(current.iowait, previous.iowait),
        irq: pct(current.irq, previous.irq),
        softirq: pct(current.softirq, previous.softirq),
        guest: pct(current.guest, previous.guest),
    }
}
