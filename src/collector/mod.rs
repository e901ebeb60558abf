//! Remote host metrics collector.
//!
//! This module runs a fixed set of shell commands on the monitored host,
//! parses their output and assembles a `Snapshot` per round, with support
//! for mocking so everything except the transport is testable offline.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Collector                           │
//! │  ┌─────────────────────┐   ┌─────────────────────────────┐  │
//! │  │     CpuTracker      │   │       probes::system        │  │
//! │  │  - previous sample  │   │  - /proc/uptime, loadavg    │  │
//! │  │  - delta → percent  │   │  - /proc/meminfo, df, ip    │  │
//! │  └──────────┬──────────┘   │  - /proc/net/dev, stat      │  │
//! │             │              └──────────────┬──────────────┘  │
//! │             └──────────────┬──────────────┘                 │
//! │                            │                                │
//! │                   ┌────────▼────────┐                       │
//! │                   │  CommandRunner  │ (trait)               │
//! │                   └────────┬────────┘                       │
//! └────────────────────────────┼────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              │               │               │
//!       ┌──────▼──────┐ ┌──────▼──────┐ ┌──────▼──────┐
//!       │  SshRunner  │ │ MockRunner  │ │  Scenarios  │
//!       │ (OpenSSH)   │ │ (Testing)   │ │ (Fixtures)  │
//!       └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production
//!
//! ```no_run
//! use remtop::collector::{Collector, SshOptions, SshRunner};
//!
//! let target = "admin@web1:22".parse().unwrap();
//! let runner = SshRunner::connect(target, SshOptions::default()).unwrap();
//! let mut collector = Collector::new(runner);
//! let snapshot = collector.collect_snapshot();
//! ```
//!
//! ## Testing (with MockRunner)
//!
//! ```
//! use remtop::collector::{Collector, MockRunner};
//!
//! let mut collector = Collector::new(MockRunner::typical_host());
//! let snapshot = collector.collect_snapshot();
//! assert!(snapshot.failures.is_empty());
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod cpu;
pub mod mock;
pub mod probes;
pub mod ssh;
pub mod traits;

pub use collector::{Collector, CollectorTiming};
pub use cpu::CpuTracker;
pub use mock::MockRunner;
pub use probes::{CollectError, ParseError};
pub use ssh::{SshOptions, SshRunner};
pub use traits::{CommandRunner, RunError};
