//! Human-readable formatting of snapshot values.

use std::fmt::Write;
use std::time::Duration;

use crate::model::{CpuPercentages, Snapshot};

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Formats a byte count with a binary unit.
///
/// Values below 1 KiB are printed exactly, larger values with two decimals
/// in a 6-wide field so columns line up.
pub fn format_bytes(bytes: u64) -> String {
    match bytes {
        b if b < KIB => format!("{} bytes", b),
        b if b < MIB => format!("{:6.2} KiB", b as f64 / KIB as f64),
        b if b < GIB => format!("{:6.2} MiB", b as f64 / MIB as f64),
        b => format!("{:6.2} GiB", b as f64 / GIB as f64),
    }
}

/// Formats an uptime as `"[<d>d ]<h>h <m>m <s>s"`.
///
/// Fractional seconds are dropped. Days are split off only while more than
/// 24 hours remain, so exactly one day prints as `24h 0m 0s`. Leading zero
/// units are omitted.
pub fn format_uptime(uptime: Duration) -> String {
    const DAY: u64 = 24 * 3600;

    let mut secs = uptime.as_secs();
    let mut days = 0;
    while secs > DAY {
        days += 1;
        secs -= DAY;
    }

    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);
    let rest = if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    };

    if days > 0 {
        format!("{}d {}", days, rest)
    } else {
        rest
    }
}

/// Formats the CPU breakdown on one line.
pub fn format_cpu(cpu: Option<&CpuPercentages>) -> String {
    let Some(cpu) = cpu else {
        return "n/a".to_string();
    };
    format!(
        "{:.2}% user, {:.2}% sys, {:.2}% nice, {:.2}% idle, {:.2}% iowait, \
         {:.2}% hardirq, {:.2}% softirq, {:.2}% guest",
        cpu.user,
        cpu.system,
        cpu.nice,
        cpu.idle,
        cpu.iowait,
        cpu.irq,
        cpu.softirq,
        cpu.guest
    )
}

/// Renders the plain text report of one snapshot.
pub fn format_report(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, snapshot);
    out
}

fn write_report(out: &mut String, s: &Snapshot) -> std::fmt::Result {
    writeln!(out, "{} up {}", s.hostname, format_uptime(s.uptime))?;
    writeln!(out)?;

    writeln!(out, "Load:")?;
    writeln!(out, "    {} {} {}", s.load.load1, s.load.load5, s.load.load15)?;
    writeln!(out)?;

    writeln!(out, "CPU:")?;
    writeln!(out, "    {}", format_cpu(s.cpu.as_ref()))?;
    writeln!(out)?;

    writeln!(out, "Processes:")?;
    writeln!(
        out,
        "    {} running of {} total",
        s.load.running_procs, s.load.total_procs
    )?;
    writeln!(out)?;

    let mem = &s.memory;
    writeln!(out, "Memory:")?;
    writeln!(out, "    free    = {}", format_bytes(mem.free))?;
    writeln!(out, "    used    = {}", format_bytes(s.memory_used()))?;
    writeln!(out, "    buffers = {}", format_bytes(mem.buffers))?;
    writeln!(out, "    cached  = {}", format_bytes(mem.cached))?;
    writeln!(
        out,
        "    swap    = {} free of {}",
        format_bytes(mem.swap_free),
        format_bytes(mem.swap_total)
    )?;
    writeln!(out)?;

    if !s.filesystems.is_empty() {
        writeln!(out, "Filesystems:")?;
        for fs in &s.filesystems {
            writeln!(
                out,
                "    {:>8}: {} free of {}",
                fs.mount_point,
                format_bytes(fs.free),
                format_bytes(fs.size())
            )?;
        }
        writeln!(out)?;
    }

    if !s.interfaces.is_empty() {
        writeln!(out, "Network Interfaces:")?;
        for (name, iface) in &s.interfaces {
            write!(out, "    {} - {}", name, iface.ipv4)?;
            if !iface.ipv6.is_empty() {
                write!(out, ", {}", iface.ipv6)?;
            }
            writeln!(out)?;
            writeln!(
                out,
                "      rx = {}, tx = {}",
                format_bytes(iface.rx_bytes),
                format_bytes(iface.tx_bytes)
            )?;
        }
        writeln!(out)?;
    }

    if !s.failures.is_empty() {
        let names: Vec<&str> = s.unavailable().map(|p| p.name()).collect();
        writeln!(out, "Unavailable: {}", names.join(", "))?;
    }

    Ok(())
}
