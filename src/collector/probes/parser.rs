//! Parsers for the output of the remote probe commands.
//!
//! These are pure functions that parse the captured text of one command
//! into structured data. They are designed to be easily testable with string
//! inputs. Every format here is positional, so fields are taken by column
//! index and lines that do not have the expected shape are skipped.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;
use tracing::trace;

use crate::model::{FilesystemEntry, LoadInfo, MemoryInfo, NetworkInterface, RawCpuSample};

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Parses `/proc/uptime` content.
///
/// Format: `<seconds since boot> <idle seconds>`, both possibly fractional.
pub fn parse_uptime(content: &str) -> Result<Duration, ParseError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(ParseError::new(format!(
            "invalid uptime format: expected 2 fields, got {}",
            parts.len()
        )));
    }

    let secs: f64 = parts[0]
        .parse()
        .map_err(|_| ParseError::new(format!("invalid uptime seconds '{}'", parts[0])))?;

    Duration::try_from_secs_f64(secs)
        .map_err(|_| ParseError::new(format!("uptime out of range: {}", parts[0])))
}

/// Parses `hostname -f` output.
pub fn parse_hostname(content: &str) -> String {
    content.trim().to_string()
}

/// Parses `/proc/loadavg` content.
///
/// Format: `0.15 0.10 0.05 1/150 1234` (three averages, running/total, last pid).
/// The values are kept verbatim.
pub fn parse_loadavg(content: &str) -> Result<LoadInfo, ParseError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() != 5 {
        return Err(ParseError::new(format!(
            "invalid loadavg format: expected 5 fields, got {}",
            parts.len()
        )));
    }

    let mut load = LoadInfo {
        load1: parts[0].to_string(),
        load5: parts[1].to_string(),
        load15: parts[2].to_string(),
        ..LoadInfo::default()
    };

    if let Some((running, total)) = parts[3].split_once('/') {
        load.running_procs = running.to_string();
        load.total_procs = total.to_string();
    }

    Ok(load)
}

/// Parses `/proc/meminfo` content.
///
/// Only `<label>: <value> kB` lines are considered. Values are converted
/// from KiB to bytes.
pub fn parse_meminfo(content: &str) -> MemoryInfo {
    let mut info = MemoryInfo::default();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 3 {
            continue;
        }

        let Ok(kib) = parts[1].parse::<u64>() else {
            trace!(line, "skipping meminfo line");
            continue;
        };
        let bytes = kib.saturating_mul(1024);

        match parts[0] {
            "MemTotal:" => info.total = bytes,
            "MemFree:" => info.free = bytes,
            "Buffers:" => info.buffers = bytes,
            "Cached:" => info.cached = bytes,
            "SwapTotal:" => info.swap_total = bytes,
            "SwapFree:" => info.swap_free = bytes,
            _ => {}
        }
    }

    info
}

/// Parses `df -B1` output.
///
/// Only filesystems backed by a `/dev/` device are returned, in output order.
/// Format:
/// ```text
/// Filesystem           1B-blocks        Used   Available Use% Mounted on
/// /dev/sda1          52710469632  9384562688 40621740032  19% /
/// /dev/mapper/vg0-home
///                   210189676544 88190287872 111273103360  45% /home
/// ```
/// A device name too long for its column puts the other five fields on the
/// next line, shifting every index down by one.
pub fn parse_df(content: &str) -> Vec<FilesystemEntry> {
    let mut filesystems = Vec::new();
    // Set by a device-only line, consumed by the 5-field line that follows it.
    let mut wrapped = false;

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let is_device = parts.first().is_some_and(|p| p.starts_with("/dev/"));

        let offset = match parts.len() {
            1 if is_device => {
                wrapped = true;
                continue;
            }
            5 if wrapped => 1,
            6 if is_device => 0,
            _ => continue,
        };
        wrapped = false;

        let Ok(used) = parts[2 - offset].parse::<u64>() else {
            trace!(line, "skipping df line with invalid used bytes");
            continue;
        };
        let Ok(free) = parts[3 - offset].parse::<u64>() else {
            trace!(line, "skipping df line with invalid available bytes");
            continue;
        };

        filesystems.push(FilesystemEntry {
            mount_point: parts[5 - offset].to_string(),
            used,
            free,
        });
    }

    filesystems
}

/// Merges `ip -o addr` output into `interfaces`.
///
/// Format (one address per line):
/// ```text
/// 2: eth0    inet 10.0.0.5/24 brd 10.0.0.255 scope global eth0\       valid_lft forever preferred_lft forever
/// 2: eth0    inet6 fe80::1/64 scope link \       valid_lft forever preferred_lft forever
/// ```
/// Interfaces are created on first sight. Only the address slot of the seen
/// family is updated; the prefix length is kept.
pub fn merge_addresses(interfaces: &mut BTreeMap<String, NetworkInterface>, content: &str) {
    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            continue;
        }

        let is_ipv4 = match parts[2] {
            "inet" => true,
            "inet6" => false,
            _ => continue,
        };

        let iface = interfaces.entry(parts[1].to_string()).or_default();
        if is_ipv4 {
            iface.ipv4 = parts[3].to_string();
        } else {
            iface.ipv6 = parts[3].to_string();
        }
    }
}

/// Merges `/proc/net/dev` byte counters into `interfaces`.
///
/// Format:
/// ```text
/// Inter-|   Receive                                                |  Transmit
///  face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
///   eth0: 9876543     5678    1    2    0     0          0        10 87654321     4321    3    4    0     0       0          0
/// ```
/// Field 1 is received bytes, field 9 is transmitted bytes. Only interfaces
/// already present in the map are updated.
pub fn merge_net_dev(interfaces: &mut BTreeMap<String, NetworkInterface>, content: &str) {
    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 17 {
            continue;
        }

        let name = parts[0].strip_suffix(':').unwrap_or(parts[0]);
        let Some(iface) = interfaces.get_mut(name) else {
            trace!(name, "ignoring counters of interface without address");
            continue;
        };

        let (Ok(rx), Ok(tx)) = (parts[1].parse::<u64>(), parts[9].parse::<u64>()) else {
            trace!(line, "skipping net/dev line with invalid counters");
            continue;
        };

        iface.rx_bytes = rx;
        iface.tx_bytes = tx;
    }
}

/// Parses the aggregate `cpu` line of `/proc/stat`.
///
/// Format: `cpu  user nice system idle iowait irq softirq steal guest guest_nice`
/// Only the first nine counters are read and summed into `total`; a counter
/// that fails to parse counts as zero.
pub fn parse_cpu_sample(content: &str) -> Result<RawCpuSample, ParseError> {
    let parts: Vec<&str> = content
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .find(|parts| parts.first() == Some(&"cpu"))
        .ok_or_else(|| ParseError::new("no aggregate cpu line in stat"))?;

    let get_val = |idx: usize| -> u64 { parts.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };

    let mut sample = RawCpuSample {
        user: get_val(1),
        nice: get_val(2),
        system: get_val(3),
        idle: get_val(4),
        iowait: get_val(5),
        irq: get_val(6),
        softirq: get_val(7),
        steal: get_val(8),
        guest: get_val(9),
        total: 0,
    };
    sample.total = [
        sample.user,
        sample.nice,
        sample.system,
        sample.idle,
        sample.iowait,
        sample.irq,
        sample.softirq,
        sample.steal,
        sample.guest,
    ]
    .iter()
    .fold(0u64, |acc, v| acc.saturating_add(*v));

    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uptime() {
        let uptime = parse_uptime("12345.67 8901.23\n").unwrap();
        assert_eq!(uptime.as_secs(), 12345);
        assert!((uptime.as_secs_f64() - 12345.67).abs() < 1e-6);

        let uptime = parse_uptime("350735.5 1234.5").unwrap();
        assert_eq!(uptime, Duration::new(350735, 500_000_000));
    }

    #[test]
    fn test_parse_uptime_invalid() {
        assert!(parse_uptime("12345.67").is_err());
        assert!(parse_uptime("").is_err());
        assert!(parse_uptime("abc 1.0").is_err());
        assert!(parse_uptime("-5.0 1.0").is_err());
        assert!(parse_uptime("inf 1.0").is_err());
    }

    #[test]
    fn test_parse_hostname() {
        assert_eq!(parse_hostname("  web1.example.com\n"), "web1.example.com");
        assert_eq!(parse_hostname(""), "");
    }

    #[test]
    fn test_parse_loadavg() {
        let load = parse_loadavg("0.15 0.10 0.05 1/150 1234\n").unwrap();

        assert_eq!(load.load1, "0.15");
        assert_eq!(load.load5, "0.10");
        assert_eq!(load.load15, "0.05");
        assert_eq!(load.running_procs, "1");
        assert_eq!(load.total_procs, "150");
    }

    #[test]
    fn test_parse_loadavg_keeps_text() {
        // Counts are not normalized to integers.
        let load = parse_loadavg("1.00 2.00 3.00 007/0150 99").unwrap();
        assert_eq!(load.running_procs, "007");
        assert_eq!(load.total_procs, "0150");
    }

    #[test]
    fn test_parse_loadavg_without_slash() {
        let load = parse_loadavg("0.15 0.10 0.05 150 1234").unwrap();
        assert_eq!(load.load1, "0.15");
        assert_eq!(load.running_procs, "");
        assert_eq!(load.total_procs, "");
    }

    #[test]
    fn test_parse_loadavg_wrong_field_count() {
        assert!(parse_loadavg("0.15 0.10 0.05 1/150").is_err());
        assert!(parse_loadavg("0.15 0.10 0.05 1/150 1234 extra").is_err());
    }

    #[test]
    fn test_parse_meminfo() {
        let content = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
SwapTotal:       4096000 kB
SwapFree:        4000000 kB
HugePages_Total:       0
";
        let info = parse_meminfo(content);

        assert_eq!(info.total, 16384000 * 1024);
        assert_eq!(info.free, 8192000 * 1024);
        assert_eq!(info.buffers, 512000 * 1024);
        assert_eq!(info.cached, 2048000 * 1024);
        assert_eq!(info.swap_total, 4096000 * 1024);
        assert_eq!(info.swap_free, 4000000 * 1024);
    }

    #[test]
    fn test_parse_meminfo_single_label() {
        let info = parse_meminfo("MemTotal: 1024 kB");
        assert_eq!(info.total, 1_048_576);
    }

    #[test]
    fn test_parse_meminfo_skips_unknown_and_malformed() {
        let info = parse_meminfo("Shmem: 1024 kB\nMemFree: lots kB\nMemTotal: 1024\n");
        assert_eq!(info, MemoryInfo::default());

        let info = parse_meminfo("MemFree: x kB\nCached: 2 kB\n");
        assert_eq!(info.free, 0);
        assert_eq!(info.cached, 2048);
    }

    #[test]
    fn test_parse_df() {
        let content = "\
Filesystem       1B-blocks        Used   Available Use% Mounted on
udev            8185450496           0  8185450496   0% /dev
tmpfs           1641598976     2281472  1639317504   1% /run
/dev/sda1      52710469632  9384562688 40621740032  19% /
/dev/sdb1     210189676544 88190287872 111273103360  45% /home
";
        let filesystems = parse_df(content);

        assert_eq!(filesystems.len(), 2);
        assert_eq!(filesystems[0].mount_point, "/");
        assert_eq!(filesystems[0].used, 9384562688);
        assert_eq!(filesystems[0].free, 40621740032);
        assert_eq!(filesystems[1].mount_point, "/home");
        assert_eq!(filesystems[1].used, 88190287872);
        assert_eq!(filesystems[1].free, 111273103360);
    }

    #[test]
    fn test_parse_df_single_line() {
        let filesystems = parse_df("/dev/sda1 100 40 60 60% /");
        assert_eq!(
            filesystems,
            vec![FilesystemEntry {
                mount_point: "/".to_string(),
                used: 40,
                free: 60,
            }]
        );
    }

    #[test]
    fn test_parse_df_wrapped_matches_unwrapped() {
        let wrapped = parse_df("/dev/sda1\n 100 40 60 60% /\n");
        let unwrapped = parse_df("/dev/sda1 100 40 60 60% /\n");
        assert_eq!(wrapped, unwrapped);
        assert_eq!(wrapped.len(), 1);
    }

    #[test]
    fn test_parse_df_mixed_layouts_keep_order() {
        let content = "\
Filesystem                    1B-blocks        Used   Available Use% Mounted on
/dev/mapper/ubuntu--vg-ubuntu--lv
                            105089261568 31006646272 68702621696  32% /
tmpfs                         4096000000           0  4096000000   0% /dev/shm
/dev/nvme0n1p2                1020702720   262246400   687468544  28% /boot
/dev/nvme0n1p1                 535805952     6369280   529436672   2% /boot/efi
/dev/nvme0n1p1                 535805952     6369280   529436672   2% /boot/efi
";
        let filesystems = parse_df(content);
        let mounts: Vec<&str> = filesystems.iter().map(|f| f.mount_point.as_str()).collect();

        // Mount order, duplicates kept.
        assert_eq!(mounts, vec!["/", "/boot", "/boot/efi", "/boot/efi"]);
        assert_eq!(filesystems[0].used, 31006646272);
        assert_eq!(filesystems[0].free, 68702621696);
    }

    #[test]
    fn test_parse_df_skips_non_numeric() {
        let content = "\
/dev/sda1 100 - 60 60% /
/dev/sda2 100 40 ? 60% /var
/dev/sda3 100 10 90 10% /srv
";
        let filesystems = parse_df(content);
        assert_eq!(filesystems.len(), 1);
        assert_eq!(filesystems[0].mount_point, "/srv");
    }

    #[test]
    fn test_parse_df_continuation_without_device_line() {
        // A 5-field line only counts after a device-only line.
        assert!(parse_df("100 40 60 60% /\n").is_empty());
    }

    #[test]
    fn test_parse_df_full_device_line_after_dangling_device() {
        // A complete device line is read as-is even when the previous
        // device-only line never got its continuation.
        let filesystems = parse_df("/dev/mapper/long\n/dev/sda1 100 40 60 60% /\n");
        assert_eq!(
            filesystems,
            vec![FilesystemEntry {
                mount_point: "/".to_string(),
                used: 40,
                free: 60,
            }]
        );
    }

    #[test]
    fn test_merge_addresses() {
        let content = "\
1: lo    inet 127.0.0.1/8 scope host lo\\       valid_lft forever preferred_lft forever
1: lo    inet6 ::1/128 scope host \\       valid_lft forever preferred_lft forever
2: eth0    inet 10.0.0.5/24 brd 10.0.0.255 scope global eth0\\       valid_lft forever preferred_lft forever
2: eth0    inet6 fe80::5054:ff:fe12:3456/64 scope link \\       valid_lft forever preferred_lft forever
3: docker0    inet 172.17.0.1/16 brd 172.17.255.255 scope global docker0\\       valid_lft forever preferred_lft forever
";
        let mut interfaces = BTreeMap::new();
        merge_addresses(&mut interfaces, content);

        assert_eq!(interfaces.len(), 3);
        assert_eq!(interfaces["lo"].ipv4, "127.0.0.1/8");
        assert_eq!(interfaces["lo"].ipv6, "::1/128");
        assert_eq!(interfaces["eth0"].ipv4, "10.0.0.5/24");
        assert_eq!(interfaces["eth0"].ipv6, "fe80::5054:ff:fe12:3456/64");
        assert_eq!(interfaces["docker0"].ipv4, "172.17.0.1/16");
        assert_eq!(interfaces["docker0"].ipv6, "");
    }

    #[test]
    fn test_merge_addresses_updates_existing() {
        let mut interfaces = BTreeMap::new();
        interfaces.insert(
            "eth0".to_string(),
            NetworkInterface {
                ipv4: "10.0.0.5/24".to_string(),
                rx_bytes: 42,
                ..NetworkInterface::default()
            },
        );

        merge_addresses(&mut interfaces, "2: eth0 inet6 fe80::1/64 scope link\n");

        assert_eq!(interfaces["eth0"].ipv4, "10.0.0.5/24");
        assert_eq!(interfaces["eth0"].ipv6, "fe80::1/64");
        assert_eq!(interfaces["eth0"].rx_bytes, 42);
    }

    #[test]
    fn test_merge_addresses_ignores_other_records() {
        let content = "\
2: eth0 link/ether 52:54:00:12:34:56 brd ff:ff:ff:ff:ff:ff
2: eth0 inet
garbage
";
        let mut interfaces = BTreeMap::new();
        merge_addresses(&mut interfaces, content);
        assert!(interfaces.is_empty());
    }

    const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 1234567     1234    0    0    0     0          0         0  1234567     1234    0    0    0     0       0          0
  eth0: 9876543     5678    1    2    0     0          0        10 87654321     4321    3    4    0     0       0          0
 wlan0: 5555555     5555    0    0    0     0          0         0  6666666     6666    0    0    0     0       0          0
";

    #[test]
    fn test_merge_net_dev() {
        let mut interfaces = BTreeMap::new();
        interfaces.insert("lo".to_string(), NetworkInterface::default());
        interfaces.insert("eth0".to_string(), NetworkInterface::default());

        merge_net_dev(&mut interfaces, NET_DEV);

        assert_eq!(interfaces.len(), 2);
        assert_eq!(interfaces["lo"].rx_bytes, 1234567);
        assert_eq!(interfaces["lo"].tx_bytes, 1234567);
        assert_eq!(interfaces["eth0"].rx_bytes, 9876543);
        assert_eq!(interfaces["eth0"].tx_bytes, 87654321);
        assert!(!interfaces.contains_key("wlan0"));
    }

    #[test]
    fn test_merge_net_dev_skips_invalid_counters() {
        let mut interfaces = BTreeMap::new();
        interfaces.insert("eth0".to_string(), NetworkInterface::default());

        let content = "  eth0: x 5678 1 2 0 0 0 10 87654321 4321 3 4 0 0 0 0\n";
        merge_net_dev(&mut interfaces, content);

        assert_eq!(interfaces["eth0"], NetworkInterface::default());
    }

    #[test]
    fn test_merge_net_dev_requires_17_fields() {
        let mut interfaces = BTreeMap::new();
        interfaces.insert("eth0".to_string(), NetworkInterface::default());

        // Name glued to the first counter, as older kernels print large values.
        let content = "  eth0:9876543 5678 1 2 0 0 0 10 87654321 4321 3 4 0 0 0 0\n";
        merge_net_dev(&mut interfaces, content);

        assert_eq!(interfaces["eth0"].rx_bytes, 0);
    }

    #[test]
    fn test_parse_cpu_sample() {
        let content = "\
cpu  10000 500 3000 80000 1000 200 100 50 25 7
cpu0 2500 125 750 20000 250 50 25 0 0 0
ctxt 500000
btime 1700000000
";
        let sample = parse_cpu_sample(content).unwrap();

        assert_eq!(sample.user, 10000);
        assert_eq!(sample.nice, 500);
        assert_eq!(sample.system, 3000);
        assert_eq!(sample.idle, 80000);
        assert_eq!(sample.iowait, 1000);
        assert_eq!(sample.irq, 200);
        assert_eq!(sample.softirq, 100);
        assert_eq!(sample.steal, 50);
        assert_eq!(sample.guest, 25);
        // guest_nice is not part of the total.
        assert_eq!(sample.total, 94875);
    }

    #[test]
    fn test_parse_cpu_sample_short_line() {
        // Old kernels print fewer columns.
        let sample = parse_cpu_sample("cpu 100 0 50 850\n").unwrap();
        assert_eq!(sample.idle, 850);
        assert_eq!(sample.steal, 0);
        assert_eq!(sample.total, 1000);
    }

    #[test]
    fn test_parse_cpu_sample_missing_aggregate() {
        assert!(parse_cpu_sample("cpu0 1 2 3 4\nintr 0\n").is_err());
        assert!(parse_cpu_sample("").is_err());
    }
}
