//! remtop - remote Linux system monitor over ssh.
//!
//! Connects to one host, collects a snapshot every interval and shows it
//! full-screen, or as a plain text report when not on a terminal.

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::EnvFilter;

use remtop::collector::{Collector, CommandRunner, SshOptions, SshRunner};
use remtop::fmt::format_report;
use remtop::model::Snapshot;
use remtop::target::{RemoteTarget, expand_home};
use remtop::tui::App;

/// Remote Linux system monitor over ssh.
#[derive(Parser)]
#[command(name = "remtop", about = "Remote Linux system monitor over ssh", version)]
struct Args {
    /// Host to monitor, as [user@]host[:port]. Aliases from ~/.ssh/config work.
    target: String,

    /// Refresh interval in seconds.
    #[arg(default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Private key file for authentication.
    #[arg(short, long, value_name = "FILE")]
    identity: Option<String>,

    /// Seconds to wait for the connection to be established.
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    connect_timeout: u64,

    /// ssh client to use.
    #[arg(long, value_name = "PATH", default_value = "ssh")]
    ssh_program: PathBuf,

    /// Print a text report every interval instead of the full-screen view.
    /// Implied when stdout is not a terminal.
    #[arg(long)]
    plain: bool,

    /// Print one report (after two rounds, so CPU usage is known) and exit.
    #[arg(long)]
    once: bool,

    /// Print snapshots as JSON lines in plain and once modes.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,

    /// Write logs to this file. The full-screen view logs nowhere else.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Tui,
    Plain,
    Once,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("remtop: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let mode = if args.once {
        Mode::Once
    } else if args.plain || args.json || !io::stdout().is_terminal() {
        Mode::Plain
    } else {
        Mode::Tui
    };

    init_logging(
        args.verbose,
        args.quiet,
        args.log_file.as_deref(),
        mode != Mode::Tui,
    )?;

    let target: RemoteTarget = args
        .target
        .parse()
        .map_err(|e| format!("invalid target '{}': {}", args.target, e))?;

    let options = SshOptions {
        program: args.ssh_program.clone(),
        identity: args.identity.as_deref().map(expand_home),
        connect_timeout: args.connect_timeout,
    };
    debug!(?options, %target, ?mode, "starting");

    let runner = SshRunner::connect(target.clone(), options)
        .map_err(|e| format!("cannot connect to {}: {}", target, e))?;
    let collector = Collector::new(runner);
    let interval = Duration::from_secs(args.interval);

    match mode {
        Mode::Tui => App::new(collector, args.target.clone())
            .run(interval)
            .map_err(|e| format!("terminal error: {}", e)),
        Mode::Plain => run_plain(collector, interval, args.json),
        Mode::Once => run_once(collector, interval, args.json),
    }
}

fn init_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
    to_stderr: bool,
) -> Result<(), String> {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("remtop={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| format!("cannot open log file {}: {}", path.display(), e))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else if to_stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .init();
    }
    // Otherwise the full-screen view owns the terminal and nothing is logged.

    Ok(())
}

/// Installs the Ctrl-C handler and returns the flag it clears.
fn shutdown_flag() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    running
}

/// Sleeps for `interval` in short slices; returns false if shut down meanwhile.
fn sleep_while_running(running: &AtomicBool, interval: Duration) -> bool {
    let sleep_interval = Duration::from_millis(100);
    let mut remaining = interval;
    while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
        let sleep_time = remaining.min(sleep_interval);
        std::thread::sleep(sleep_time);
        remaining = remaining.saturating_sub(sleep_time);
    }
    running.load(Ordering::SeqCst)
}

fn print_snapshot(out: &mut impl Write, snapshot: &Snapshot, json: bool) -> Result<(), String> {
    let text = if json {
        let mut line = serde_json::to_string(snapshot).map_err(|e| e.to_string())?;
        line.push('\n');
        line
    } else {
        format_report(snapshot)
    };
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| format!("cannot write output: {}", e))
}

fn run_plain<R: CommandRunner>(
    mut collector: Collector<R>,
    interval: Duration,
    json: bool,
) -> Result<(), String> {
    let running = shutdown_flag();
    let clear = !json && io::stdout().is_terminal();
    let mut stdout = io::stdout();

    info!("Starting collection loop");
    while running.load(Ordering::SeqCst) {
        let snapshot = collector.collect_snapshot();

        if clear {
            // Best effort; a failed clear only leaves old output above.
            let _ = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0));
        }
        print_snapshot(&mut stdout, &snapshot, json)?;

        if !sleep_while_running(&running, interval) {
            break;
        }
    }

    info!("Shutting down");
    Ok(())
}

fn run_once<R: CommandRunner>(
    mut collector: Collector<R>,
    interval: Duration,
    json: bool,
) -> Result<(), String> {
    let running = shutdown_flag();

    // Priming round for the CPU baseline
    collector.collect_snapshot();
    if !sleep_while_running(&running, interval) {
        return Ok(());
    }

    let snapshot = collector.collect_snapshot();
    print_snapshot(&mut io::stdout(), &snapshot, json)
}
