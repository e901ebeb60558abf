//! Summary widget showing load, CPU and memory in top-style lines.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::fmt::format_bytes;
use crate::model::{Probe, Snapshot};
use crate::tui::style::Styles;

use super::percent;

/// Lines rendered by [`render_summary`].
pub const SUMMARY_HEIGHT: u16 = 4;

/// Renders the summary panel.
pub fn render_summary(frame: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
    frame.render_widget(Paragraph::new(summary_lines(snapshot)), area);
}

fn metric(label: &str, value: String, style: Style) -> [Span<'static>; 3] {
    [
        Span::raw(format!("{}:", label)),
        Span::styled(value, style),
        Span::raw("  "),
    ]
}

fn prefix(name: &'static str, style: Style) -> Vec<Span<'static>> {
    vec![Span::styled(name, style), Span::raw(" │ ")]
}

fn unavailable(mut spans: Vec<Span<'static>>, text: &'static str) -> Line<'static> {
    spans.push(Span::styled(text, Styles::dim()));
    Line::from(spans)
}

fn summary_lines(snapshot: Option<&Snapshot>) -> Vec<Line<'static>> {
    let Some(s) = snapshot else {
        return vec![Line::from(Span::styled("waiting for first round", Styles::dim()))];
    };

    vec![load_line(s), cpu_line(s), mem_line(s), swap_line(s)]
}

fn load_line(s: &Snapshot) -> Line<'static> {
    let mut spans = prefix("CPL", Styles::cpu());
    if !s.is_available(Probe::Load) {
        return unavailable(spans, "unavailable");
    }
    let load = &s.load;
    spans.extend(metric("avg1", load.load1.clone(), Styles::default()));
    spans.extend(metric("avg5", load.load5.clone(), Styles::default()));
    spans.extend(metric("avg15", load.load15.clone(), Styles::default()));
    spans.extend(metric("run", load.running_procs.clone(), Styles::default()));
    spans.extend(metric("procs", load.total_procs.clone(), Styles::default()));
    Line::from(spans)
}

fn cpu_line(s: &Snapshot) -> Line<'static> {
    let mut spans = prefix("CPU", Styles::cpu());
    if !s.is_available(Probe::Cpu) {
        return unavailable(spans, "unavailable");
    }
    let Some(cpu) = &s.cpu else {
        return unavailable(spans, "n/a until next round");
    };

    let busy = 100.0 - cpu.idle as f64 - cpu.iowait as f64;
    for (label, value) in [
        ("user", cpu.user),
        ("sys", cpu.system),
        ("nice", cpu.nice),
        ("idle", cpu.idle),
        ("wait", cpu.iowait),
        ("irq", cpu.irq),
        ("sirq", cpu.softirq),
        ("guest", cpu.guest),
    ] {
        let style = if label == "idle" {
            Styles::for_percent(busy)
        } else {
            Styles::default()
        };
        spans.extend(metric(label, format!("{:.2}%", value), style));
    }
    Line::from(spans)
}

fn mem_line(s: &Snapshot) -> Line<'static> {
    let mut spans = prefix("MEM", Styles::mem());
    if !s.is_available(Probe::Memory) {
        return unavailable(spans, "unavailable");
    }
    let mem = &s.memory;
    let used = s.memory_used();
    spans.extend(metric("tot", format_bytes(mem.total), Styles::default()));
    spans.extend(metric("free", format_bytes(mem.free), Styles::default()));
    spans.extend(metric(
        "used",
        format_bytes(used),
        Styles::for_percent(percent(used, mem.total)),
    ));
    spans.extend(metric("buff", format_bytes(mem.buffers), Styles::default()));
    spans.extend(metric("cache", format_bytes(mem.cached), Styles::default()));
    Line::from(spans)
}

fn swap_line(s: &Snapshot) -> Line<'static> {
    let mut spans = prefix("SWP", Styles::mem());
    if !s.is_available(Probe::Memory) {
        return unavailable(spans, "unavailable");
    }
    let mem = &s.memory;
    let used = mem.swap_total.saturating_sub(mem.swap_free);
    spans.extend(metric("tot", format_bytes(mem.swap_total), Styles::default()));
    spans.extend(metric(
        "free",
        format_bytes(mem.swap_free),
        Styles::for_percent(percent(used, mem.swap_total)),
    ));
    Line::from(spans)
}
