//! Command lines run on the remote host, one per probe.
//!
//! The parsers depend on the exact output shape of these commands.

pub const UPTIME: &str = "/bin/cat /proc/uptime";
pub const HOSTNAME: &str = "/bin/hostname -f";
pub const LOADAVG: &str = "/bin/cat /proc/loadavg";
pub const MEMINFO: &str = "/bin/cat /proc/meminfo";
/// Sizes in bytes, no block rounding.
pub const DF: &str = "/bin/df -B1";
/// One record per line (`-o`), tried in order until one succeeds.
pub const IP_ADDR: [&str; 2] = ["/bin/ip -o addr", "/sbin/ip -o addr"];
pub const NET_DEV: &str = "/bin/cat /proc/net/dev";
pub const STAT: &str = "/bin/cat /proc/stat";
