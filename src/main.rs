mod app;
mod cli;
mod domain;
mod infra;

use crate::cli::CliInvocation;
use crate::infra::LOG_FILTER_ENV;
use std::io::{self, Write};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    Cli(#[from] crate::cli::CliRunError),
}

fn main() {
    init_tracing();
    if let Err(error) = run_main() {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so tab-separated stdout stays pipeable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn run_main() -> Result<(), MainError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match crate::cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Command { state_dir, command } => {
            tracing::debug!(?command, "running command");
            crate::cli::run(command, state_dir.as_deref())?;
            Ok(())
        }
    }
}

fn print_help() {
    let text = format!(
        "{name} - log call outcomes and track session and historical stats\n\nUSAGE:\n  {name} [--state-dir DIR] [COMMAND]      Defaults to `stats`\n  {name} outcomes                         List outcome codes and labels\n  {name} add <outcome> [--notes TEXT]     Log a call in the active session\n  {name} update <id> <outcome> [--notes TEXT]  Replace a record's outcome and notes\n  {name} delete <id>                      Remove a record from the active session\n  {name} list [--limit N] [--offset N] [--all]  List active records (or every session), newest first\n  {name} stats                            Active session statistics\n  {name} new-session                      Close the active session and start a new one\n  {name} history [--range week|month|quarter|year] [--json]  Daily activity across sessions\n  {name} slots                            Today's confirmed sales per time slot\n  {name} import <file> [--format csv|json]  Merge calls from a CSV or JSON file\n  {name} export [--out FILE|DIR]          Today's calls as CSV\n  {name} --help | --version\n\nOUTCOMES:\n  Pass a code (e.g. confirmed-sale) or a label (e.g. \"Wrong Number\").\n\nLIST FLAGS:\n  --limit N      Max records to print (default: 20)\n  --offset N     Skip first N records (default: 0)\n  --all          List records from every session\n\nOUTPUT:\n  list:    timestamp<TAB>id<TAB>outcome<TAB>notes\n  history: date<TAB>calls<TAB>successful<TAB>confirmed_sales<TAB>intensity\n  slots:   period<TAB>start-end<TAB>sales/target<TAB>carried=N<TAB>met|open\n\nENV:\n  CALLTALLY_STATE_DIR  Override state dir (default: ~/.calltally)\n  CALLTALLY_DB         Override database path (default: <state-dir>/state.db)\n  CALLTALLY_LOG        Log filter, e.g. debug (default: warn)\n",
        name = env!("CARGO_PKG_NAME")
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}
