use std::env;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use registry_scan::constants::DEFAULT_FILE;
use registry_scan::{CancelFlag, ScanStatus, SearchOptions, Strategy};
use tracing_subscriber::EnvFilter;

const FILE_VAR: &str = "REGISTRY_FILE";
const STRATEGY_VAR: &str = "REGISTRY_STRATEGY";
const INTERRUPTED_STATUS: i32 = 130;

#[derive(Parser, Debug)]
#[command(
    name = "registry-search",
    version,
    about = "Search the merged business register export by registry code or name",
    after_help = "Environment:\n  REGISTRY_FILE      file to search (default: merged_registry.json)\n  REGISTRY_STRATEGY  mapped, sequential or structural (default: mapped)\n  RUST_LOG           diagnostics filter (default: warn)"
)]
struct Args {
    /// Search term; several words are joined with spaces. Digits only: exact
    /// registry code. Anything else: case-insensitive substring.
    #[arg(required = true, num_args = 1.., value_name = "term")]
    term: Vec<String>,
}

fn main() {
    match run() {
        Ok(status) => std::process::exit(status),
        Err(err) => {
            eprintln!("ERROR  {err}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32, Box<dyn Error>> {
    let args = Args::parse();
    init_tracing();

    let term = args.term.join(" ");
    let path = env::var_os(FILE_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE));
    let strategy = match env::var(STRATEGY_VAR) {
        Ok(raw) => raw.parse::<Strategy>()?,
        Err(_) => Strategy::default(),
    };
    let options = SearchOptions::new().with_strategy(strategy);

    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || handler_flag.cancel())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = writeln!(out, "Searching for '{term}' in {}...", path.display()) {
        return disconnect_or(err);
    }

    let report = registry_scan::search_with_options(&path, &term, &mut out, &options, &cancel)?;
    tracing::debug!(?report, "search done");

    match report.status {
        ScanStatus::Completed | ScanStatus::Disconnected => Ok(0),
        ScanStatus::Interrupted => {
            if let Err(err) = writeln!(out, "\nInterrupted.").and_then(|()| out.flush()) {
                return disconnect_or(err);
            }
            Ok(INTERRUPTED_STATUS)
        }
    }
}

fn disconnect_or(err: io::Error) -> Result<i32, Box<dyn Error>> {
    if err.kind() == io::ErrorKind::BrokenPipe {
        return Ok(0);
    }
    Err(err.into())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
