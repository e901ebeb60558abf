//! Pre-built mock host scenarios for testing.
//!
//! These scenarios provide realistic command output for the probes run on
//! a monitored host.

use super::runner::MockRunner;
use crate::collector::probes::commands;

const MEMINFO: &str = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
Active:          4096000 kB
Inactive:        2048000 kB
SwapTotal:       4096000 kB
SwapFree:        3072000 kB
Dirty:              1024 kB
Slab:             512000 kB
";

const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  123456     1000    0    0    0     0          0         0   123456     1000    0    0    0     0       0          0
  eth0: 9876543     5678    1    2    0     0          0        10 87654321     4321    3    4    0     0       0          0
docker0:       0        0    0    0    0     0          0         0        0        0    0    0    0     0       0          0
";

const IP_ADDR: &str = "\
1: lo    inet 127.0.0.1/8 scope host lo\\       valid_lft forever preferred_lft forever
1: lo    inet6 ::1/128 scope host \\       valid_lft forever preferred_lft forever
2: eth0    inet 10.0.0.5/24 brd 10.0.0.255 scope global eth0\\       valid_lft forever preferred_lft forever
2: eth0    inet6 fe80::5054:ff:fe12:3456/64 scope link \\       valid_lft forever preferred_lft forever
";

impl MockRunner {
    /// Creates a healthy host where every probe succeeds.
    ///
    /// `/proc/stat` returns two samples 2000 ticks apart: 30% user,
    /// 10% system, 55% idle and 5% iowait.
    pub fn typical_host() -> Self {
        let mut runner = Self::new();

        runner.add_output(commands::UPTIME, "350735.47 1382939.22\n");
        runner.add_output(commands::HOSTNAME, "web-01.example.com\n");
        runner.add_output(commands::LOADAVG, "0.15 0.10 0.05 1/150 1234\n");
        runner.add_output(commands::MEMINFO, MEMINFO);
        runner.add_output(
            commands::DF,
            "\
Filesystem        1B-blocks         Used    Available Use% Mounted on
udev             8354037760            0   8354037760   0% /dev
tmpfs            1675829248      2351104   1673478144   1% /run
/dev/sda1       52710469632   9384562688  40621740032  19% /
/dev/sdb1      983349346304 421318066176 512006479872  46% /data
tmpfs            8379138048            0   8379138048   0% /dev/shm
",
        );
        runner.add_output(commands::IP_ADDR[0], IP_ADDR);
        runner.add_output(commands::NET_DEV, NET_DEV);
        runner.add_output(
            commands::STAT,
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 5000 250 1500 40000 500 100 50 0 0 0
cpu1 5000 250 1500 40000 500 100 50 0 0 0
intr 1000000 50 0 0 0
ctxt 500000
btime 1700000000
processes 12345
procs_running 1
procs_blocked 0
",
        );
        runner.add_output(
            commands::STAT,
            "\
cpu  10600 500 3200 81100 1100 200 100 0 0 0
cpu0 5300 250 1600 40550 550 100 50 0 0 0
cpu1 5300 250 1600 40550 550 100 50 0 0 0
intr 1002000 50 0 0 0
ctxt 501000
btime 1700000000
processes 12350
procs_running 2
procs_blocked 0
",
        );

        runner
    }

    /// Creates a host with `ip` only in `/sbin` and a device name long
    /// enough to wrap the `df` output.
    pub fn legacy_host() -> Self {
        let mut runner = Self::typical_host();

        runner.remove(commands::IP_ADDR[0]);
        runner.add_failure(commands::IP_ADDR[0], 127, "sh: 1: /bin/ip: not found\n");
        runner.add_output(commands::IP_ADDR[1], IP_ADDR);

        runner.remove(commands::DF);
        runner.add_output(
            commands::DF,
            "\
Filesystem           1B-blocks         Used    Available Use% Mounted on
/dev/sda1          52710469632   9384562688  40621740032  19% /
/dev/mapper/vg0-home
                  210189676544  88190287872 111273103360  45% /home
",
        );

        runner
    }

    /// Creates a host where some probes fail every round.
    ///
    /// `df` exits non-zero, `/proc/net/dev` cannot be read and `/proc/stat`
    /// has no aggregate cpu line.
    pub fn degraded_host() -> Self {
        let mut runner = Self::typical_host();

        runner.remove(commands::DF);
        runner.add_failure(commands::DF, 1, "df: /mnt/nfs: Stale file handle\n");

        runner.remove(commands::NET_DEV);

        runner.remove(commands::STAT);
        runner.add_output(commands::STAT, "intr 1000000 50 0 0 0\nctxt 500000\n");

        runner
    }
}

#[cfg(test)]
mod tests {
    use crate::collector::mock::MockRunner;
    use crate::collector::probes::commands;
    use crate::collector::traits::CommandRunner;

    #[test]
    fn test_typical_host_answers_every_probe() {
        let runner = MockRunner::typical_host();

        for command in [
            commands::UPTIME,
            commands::HOSTNAME,
            commands::LOADAVG,
            commands::MEMINFO,
            commands::DF,
            commands::IP_ADDR[0],
            commands::NET_DEV,
            commands::STAT,
        ] {
            assert!(runner.run(command).is_ok(), "{} failed", command);
        }
    }

    #[test]
    fn test_typical_host_stat_advances() {
        let runner = MockRunner::typical_host();
        let first = runner.run(commands::STAT).unwrap();
        let second = runner.run(commands::STAT).unwrap();
        assert_ne!(first, second);
        assert_eq!(runner.run(commands::STAT).unwrap(), second);
    }

    #[test]
    fn test_legacy_host_ip_location() {
        let runner = MockRunner::legacy_host();
        assert!(runner.run(commands::IP_ADDR[0]).is_err());
        assert!(runner.run(commands::IP_ADDR[1]).is_ok());
    }

    #[test]
    fn test_degraded_host_failures() {
        let runner = MockRunner::degraded_host();
        assert!(runner.run(commands::DF).is_err());
        assert!(runner.run(commands::NET_DEV).is_err());
        assert!(!runner.run(commands::STAT).unwrap().starts_with("cpu "));
    }
}
