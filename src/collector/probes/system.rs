//! Probe functions: run one remote command and parse its output.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use super::commands;
use super::parser::{
    ParseError, merge_addresses, merge_net_dev, parse_cpu_sample, parse_df, parse_hostname,
    parse_loadavg, parse_meminfo, parse_uptime,
};
use crate::collector::traits::{CommandRunner, RunError};
use crate::model::{FilesystemEntry, LoadInfo, MemoryInfo, NetworkInterface, RawCpuSample};

/// Error type for probe failures.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The command could not be run.
    #[error(transparent)]
    Run(#[from] RunError),
    /// The command output has an unexpected shape.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Collects time since boot from `/proc/uptime`.
pub fn collect_uptime<R: CommandRunner + ?Sized>(runner: &R) -> Result<Duration, CollectError> {
    let content = runner.run(commands::UPTIME)?;
    Ok(parse_uptime(&content)?)
}

/// Collects the fully qualified host name.
pub fn collect_hostname<R: CommandRunner + ?Sized>(runner: &R) -> Result<String, CollectError> {
    let content = runner.run(commands::HOSTNAME)?;
    Ok(parse_hostname(&content))
}

/// Collects load averages and process counts from `/proc/loadavg`.
pub fn collect_load<R: CommandRunner + ?Sized>(runner: &R) -> Result<LoadInfo, CollectError> {
    let content = runner.run(commands::LOADAVG)?;
    Ok(parse_loadavg(&content)?)
}

/// Collects memory and swap totals from `/proc/meminfo`.
pub fn collect_memory<R: CommandRunner + ?Sized>(runner: &R) -> Result<MemoryInfo, CollectError> {
    let content = runner.run(commands::MEMINFO)?;
    Ok(parse_meminfo(&content))
}

/// Collects block-device filesystem usage from `df`.
pub fn collect_filesystems<R: CommandRunner + ?Sized>(
    runner: &R,
) -> Result<Vec<FilesystemEntry>, CollectError> {
    let content = runner.run(commands::DF)?;
    Ok(parse_df(&content))
}

/// Collects interface addresses into `interfaces`.
///
/// `ip` lives in `/bin` on some distributions and in `/sbin` on others; the
/// probe fails only if every location fails.
pub fn collect_interface_addresses<R: CommandRunner + ?Sized>(
    runner: &R,
    interfaces: &mut BTreeMap<String, NetworkInterface>,
) -> Result<(), CollectError> {
    let mut last_error = None;

    for command in commands::IP_ADDR {
        match runner.run(command) {
            Ok(content) => {
                merge_addresses(interfaces, &content);
                return Ok(());
            }
            Err(e) => {
                debug!(command, error = %e, "address listing failed");
                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| RunError::Unavailable("no address listing command".to_string()))
        .into())
}

/// Collects byte counters from `/proc/net/dev` for interfaces already in
/// `interfaces`.
pub fn collect_interface_counters<R: CommandRunner + ?Sized>(
    runner: &R,
    interfaces: &mut BTreeMap<String, NetworkInterface>,
) -> Result<(), CollectError> {
    let content = runner.run(commands::NET_DEV)?;
    merge_net_dev(interfaces, &content);
    Ok(())
}

/// Reads `/proc/stat` and returns the raw aggregate CPU sample.
///
/// Transport and parse failures are distinguished so the caller can decide
/// what happens to its previous sample.
pub fn collect_cpu_sample<R: CommandRunner + ?Sized>(
    runner: &R,
) -> Result<Result<RawCpuSample, ParseError>, RunError> {
    let content = runner.run(commands::STAT)?;
    Ok(parse_cpu_sample(&content))
}
