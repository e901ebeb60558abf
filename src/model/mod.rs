//! Data model for one collection round.
//!
//! A [`Snapshot`] is assembled by the collector from the output of the remote
//! probes and handed to the renderers. It is never shared between rounds.

mod snapshot;
mod system;

pub use snapshot::{Probe, ProbeFailure, Snapshot};
pub use system::{
    CpuPercentages, FilesystemEntry, LoadInfo, MemoryInfo, NetworkInterface, RawCpuSample,
};
