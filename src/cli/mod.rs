use crate::app::{CallTracker, Clock, ImportReport, SystemClock, TrackerError};
use crate::domain::{
    ActivityRange, CallRecord, DayActivity, ImportFormat, OutcomeCode, SlotProgress,
    export_file_name, summarize_activity,
};
use crate::infra::{
    KeyValueStore, KvError, ResolveStateDirError, SqliteStore, resolve_db_path,
    resolve_state_dir,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

const DEFAULT_LIMIT: usize = 20;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Command {
        state_dir: Option<PathBuf>,
        command: CliCommand,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliCommand {
    Outcomes,
    Add {
        outcome: OutcomeCode,
        notes: Option<String>,
    },
    Update {
        id: String,
        outcome: OutcomeCode,
        notes: Option<String>,
    },
    Delete {
        id: String,
    },
    List {
        offset: usize,
        limit: usize,
        /// Every persisted session instead of the active one.
        all: bool,
    },
    Stats,
    NewSession,
    History {
        range: ActivityRange,
        json: bool,
    },
    Slots,
    Import {
        path: PathBuf,
        format: Option<ImportFormat>,
    },
    Export {
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
pub enum CliParseError {
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(String),

    #[error("invalid value for {flag}: {value}")]
    InvalidFlagValue { flag: String, value: String },

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("unknown outcome: {0}\nHint: run `calltally outcomes` for the list of codes.")]
    UnknownOutcome(String),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut iter = args.iter().skip(1).peekable();
    let mut state_dir: Option<PathBuf> = None;
    while iter.peek().is_some_and(|arg| arg.as_str() == "--state-dir") {
        let _ = iter.next();
        let value = iter
            .next()
            .ok_or_else(|| CliParseError::MissingFlagValue("--state-dir".to_string()))?;
        state_dir = Some(PathBuf::from(value));
    }

    let Some(subcommand) = iter.next() else {
        return Ok(CliInvocation::Command {
            state_dir,
            command: CliCommand::Stats,
        });
    };

    let rest = iter.map(String::as_str).collect::<Vec<_>>();
    let command = match subcommand.as_str() {
        "outcomes" => {
            expect_no_args(&rest)?;
            CliCommand::Outcomes
        }
        "stats" => {
            expect_no_args(&rest)?;
            CliCommand::Stats
        }
        "new-session" => {
            expect_no_args(&rest)?;
            CliCommand::NewSession
        }
        "slots" => {
            expect_no_args(&rest)?;
            CliCommand::Slots
        }
        "add" => {
            let (positionals, notes) = parse_notes_args(&rest)?;
            let [outcome] = positionals.as_slice() else {
                return Err(missing_or_unexpected(&positionals, 1, "outcome"));
            };
            CliCommand::Add {
                outcome: parse_outcome_arg(outcome)?,
                notes,
            }
        }
        "update" => {
            let (positionals, notes) = parse_notes_args(&rest)?;
            let [id, outcome] = positionals.as_slice() else {
                return Err(missing_or_unexpected(&positionals, 2, "id and outcome"));
            };
            CliCommand::Update {
                id: (*id).to_string(),
                outcome: parse_outcome_arg(outcome)?,
                notes,
            }
        }
        "delete" => {
            let [id] = rest.as_slice() else {
                return Err(missing_or_unexpected(&rest, 1, "id"));
            };
            if id.starts_with('-') {
                return Err(CliParseError::UnknownFlag((*id).to_string()));
            }
            CliCommand::Delete {
                id: (*id).to_string(),
            }
        }
        "list" => {
            let mut offset = 0usize;
            let mut limit = DEFAULT_LIMIT;
            let mut all = false;
            let mut args = rest.iter();
            while let Some(arg) = args.next() {
                match *arg {
                    "--limit" | "-l" => {
                        let value = args.next().ok_or_else(|| {
                            CliParseError::MissingFlagValue("--limit".to_string())
                        })?;
                        limit = parse_usize_flag("--limit", value)?;
                    }
                    "--offset" | "-o" => {
                        let value = args.next().ok_or_else(|| {
                            CliParseError::MissingFlagValue("--offset".to_string())
                        })?;
                        offset = parse_usize_flag("--offset", value)?;
                    }
                    "--all" | "-a" => all = true,
                    _ if arg.starts_with('-') => {
                        return Err(CliParseError::UnknownFlag((*arg).to_string()));
                    }
                    _ => return Err(CliParseError::UnexpectedArgument((*arg).to_string())),
                }
            }
            CliCommand::List { offset, limit, all }
        }
        "history" => {
            let mut range = ActivityRange::Quarter;
            let mut json = false;
            let mut args = rest.iter();
            while let Some(arg) = args.next() {
                match *arg {
                    "--range" | "-r" => {
                        let value = args.next().ok_or_else(|| {
                            CliParseError::MissingFlagValue("--range".to_string())
                        })?;
                        range = value.parse::<ActivityRange>().map_err(|_| {
                            CliParseError::InvalidFlagValue {
                                flag: "--range".to_string(),
                                value: (*value).to_string(),
                            }
                        })?;
                    }
                    "--json" => json = true,
                    _ if arg.starts_with('-') => {
                        return Err(CliParseError::UnknownFlag((*arg).to_string()));
                    }
                    _ => return Err(CliParseError::UnexpectedArgument((*arg).to_string())),
                }
            }
            CliCommand::History { range, json }
        }
        "import" => {
            let mut path: Option<PathBuf> = None;
            let mut format: Option<ImportFormat> = None;
            let mut args = rest.iter();
            while let Some(arg) = args.next() {
                match *arg {
                    "--format" | "-f" => {
                        let value = args.next().ok_or_else(|| {
                            CliParseError::MissingFlagValue("--format".to_string())
                        })?;
                        format = Some(value.parse::<ImportFormat>().map_err(|_| {
                            CliParseError::InvalidFlagValue {
                                flag: "--format".to_string(),
                                value: (*value).to_string(),
                            }
                        })?);
                    }
                    _ if arg.starts_with('-') && *arg != "-" => {
                        return Err(CliParseError::UnknownFlag((*arg).to_string()));
                    }
                    _ => {
                        if path.is_some() {
                            return Err(CliParseError::UnexpectedArgument((*arg).to_string()));
                        }
                        path = Some(PathBuf::from(arg));
                    }
                }
            }
            let path = path.ok_or(CliParseError::MissingArgument("file"))?;
            CliCommand::Import { path, format }
        }
        "export" => {
            let mut out: Option<PathBuf> = None;
            let mut args = rest.iter();
            while let Some(arg) = args.next() {
                match *arg {
                    "--out" | "-o" => {
                        let value = args.next().ok_or_else(|| {
                            CliParseError::MissingFlagValue("--out".to_string())
                        })?;
                        out = Some(PathBuf::from(value));
                    }
                    _ if arg.starts_with('-') => {
                        return Err(CliParseError::UnknownFlag((*arg).to_string()));
                    }
                    _ => return Err(CliParseError::UnexpectedArgument((*arg).to_string())),
                }
            }
            CliCommand::Export { out }
        }
        other => return Err(CliParseError::UnknownSubcommand(other.to_string())),
    };

    Ok(CliInvocation::Command { state_dir, command })
}

fn expect_no_args(rest: &[&str]) -> Result<(), CliParseError> {
    match rest.first() {
        Some(arg) if arg.starts_with('-') => Err(CliParseError::UnknownFlag((*arg).to_string())),
        Some(arg) => Err(CliParseError::UnexpectedArgument((*arg).to_string())),
        None => Ok(()),
    }
}

fn missing_or_unexpected(positionals: &[&str], expected: usize, what: &'static str) -> CliParseError {
    match positionals.get(expected) {
        Some(extra) => CliParseError::UnexpectedArgument((*extra).to_string()),
        None => CliParseError::MissingArgument(what),
    }
}

/// Splits `--notes TEXT` out of the remaining arguments.
fn parse_notes_args<'a>(rest: &[&'a str]) -> Result<(Vec<&'a str>, Option<String>), CliParseError> {
    let mut positionals = Vec::new();
    let mut notes: Option<String> = None;
    let mut args = rest.iter();
    while let Some(arg) = args.next() {
        match *arg {
            "--notes" | "-n" => {
                let value = args
                    .next()
                    .ok_or_else(|| CliParseError::MissingFlagValue("--notes".to_string()))?;
                notes = Some((*value).to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(CliParseError::UnknownFlag((*arg).to_string()));
            }
            _ => positionals.push(*arg),
        }
    }
    Ok((positionals, notes))
}

fn parse_outcome_arg(value: &str) -> Result<OutcomeCode, CliParseError> {
    value
        .parse::<OutcomeCode>()
        .ok()
        .or_else(|| OutcomeCode::match_label(value))
        .ok_or_else(|| CliParseError::UnknownOutcome(value.to_string()))
}

fn parse_usize_flag(flag: &str, value: &str) -> Result<usize, CliParseError> {
    value
        .parse::<usize>()
        .map_err(|_| CliParseError::InvalidFlagValue {
            flag: flag.to_string(),
            value: value.to_string(),
        })
}

#[derive(Debug, Error)]
pub enum CliRunError {
    #[error(transparent)]
    StateDir(#[from] ResolveStateDirError),

    #[error(transparent)]
    Store(#[from] KvError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("record not found in the active session: {0}\nHint: run `calltally list` and copy the id column.")]
    RecordNotFound(String),

    #[error("cannot infer import format for {0}\nHint: pass --format csv|json.")]
    UnknownImportFormat(String),

    #[error("failed to read {path}: {source}")]
    ReadImport { path: String, source: io::Error },

    #[error("failed to write {path}: {source}")]
    WriteExport { path: String, source: io::Error },

    #[error("no calls logged today; nothing to export")]
    NothingToExport,

    #[error(transparent)]
    WriteOutput(#[from] io::Error),
}

pub fn run(command: CliCommand, state_dir: Option<&Path>) -> Result<(), CliRunError> {
    let state_dir = resolve_state_dir(state_dir)?;
    let store = SqliteStore::open(resolve_db_path(&state_dir))?;
    tracing::debug!(db = %store.db_path().display(), "opened state store");
    let mut tracker = CallTracker::open(store, SystemClock)?;
    for blob in tracker.skipped_blobs() {
        tracing::warn!(key = %blob.key, reason = %blob.reason, "skipped unreadable session");
    }

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    execute(command, &mut tracker, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn execute<S: KeyValueStore, C: Clock>(
    command: CliCommand,
    tracker: &mut CallTracker<S, C>,
    out: &mut impl Write,
) -> Result<(), CliRunError> {
    match command {
        CliCommand::Outcomes => {
            for outcome in OutcomeCode::ALL {
                if !write_line(out, &format!("{}\t{}", outcome.code(), outcome.label()))? {
                    break;
                }
            }
        }
        CliCommand::Add { outcome, notes } => {
            let record = tracker.add_record(outcome, notes.as_deref())?;
            write_line(out, &record.id)?;
        }
        CliCommand::Update { id, outcome, notes } => {
            if !tracker.update_record(&id, outcome, notes.as_deref())? {
                return Err(CliRunError::RecordNotFound(id));
            }
        }
        CliCommand::Delete { id } => {
            if !tracker.delete_record(&id)? {
                return Err(CliRunError::RecordNotFound(id));
            }
        }
        CliCommand::List { offset, limit, all } => {
            let records = if all {
                tracker.historical_records()
            } else {
                tracker.active_records()
            };
            for record in records.iter().skip(offset).take(limit) {
                if !write_line(out, &format_record_line(record))? {
                    break;
                }
            }
        }
        CliCommand::Stats => write_stats(out, tracker)?,
        CliCommand::NewSession => {
            let session = tracker.start_new_session()?;
            write_line(out, &session.id)?;
        }
        CliCommand::History { range, json } => {
            let days = tracker.activity(range);
            if json {
                let payload = build_history_json_payload(range, &days);
                writeln!(out, "{payload}")?;
            } else {
                write_history(out, &days)?;
            }
        }
        CliCommand::Slots => {
            for slot in tracker.daily_sales() {
                if !write_line(out, &format_slot_line(&slot))? {
                    break;
                }
            }
        }
        CliCommand::Import { path, format } => {
            let format = match format {
                Some(format) => format,
                None => infer_import_format(&path)?,
            };
            let content = fs::read_to_string(&path).map_err(|source| CliRunError::ReadImport {
                path: path.display().to_string(),
                source,
            })?;
            let ImportReport { imported, dropped } = tracker.import_from_text(&content, format)?;
            write_line(out, &format!("imported\t{imported}\tdropped\t{dropped}"))?;
        }
        CliCommand::Export { out: target } => {
            let csv = tracker
                .export_today_csv()
                .ok_or(CliRunError::NothingToExport)?;
            match target {
                None => write_line(out, &csv).map(|_| ())?,
                Some(target) => {
                    let path = if target.is_dir() {
                        target.join(export_file_name(tracker.today()))
                    } else {
                        target
                    };
                    fs::write(&path, format!("{csv}\n")).map_err(|source| {
                        CliRunError::WriteExport {
                            path: path.display().to_string(),
                            source,
                        }
                    })?;
                    write_line(out, &path.display().to_string())?;
                }
            }
        }
    }
    Ok(())
}

fn infer_import_format(path: &Path) -> Result<ImportFormat, CliRunError> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse::<ImportFormat>().ok())
        .ok_or_else(|| CliRunError::UnknownImportFormat(path.display().to_string()))
}

fn format_record_line(record: &CallRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        record.timestamp.format(&Rfc3339).unwrap_or_default(),
        record.id,
        record.outcome.code(),
        record.notes.as_deref().unwrap_or("").replace('\n', "\\n")
    )
}

fn write_stats<S: KeyValueStore, C: Clock>(
    out: &mut impl Write,
    tracker: &CallTracker<S, C>,
) -> io::Result<()> {
    let stats = tracker.stats();
    let mut lines = vec![
        format!("session\t{}", tracker.active_session().id),
        format!("total_calls\t{}", stats.total_calls),
        format!("confirmed_sales\t{}", stats.confirmed_sales),
        format!("yes_ratio\t{:.1}%", stats.yes_ratio),
        format!("engagement_ratio\t{:.1}%", stats.engagement_ratio),
    ];
    lines.extend(OutcomeCode::ALL.into_iter().filter_map(|outcome| {
        let count = stats.count(outcome);
        (count > 0).then(|| format!("outcome\t{}\t{count}", outcome.code()))
    }));
    for line in lines {
        if !write_line(out, &line)? {
            break;
        }
    }
    Ok(())
}

fn write_history(out: &mut impl Write, days: &[DayActivity]) -> io::Result<()> {
    for day in days {
        let line = format!(
            "{}\t{}\t{}\t{}\t{}",
            day.date, day.calls, day.successful, day.confirmed_sales, day.intensity
        );
        if !write_line(out, &line)? {
            return Ok(());
        }
    }
    let summary = summarize_activity(days);
    write_line(
        out,
        &format!(
            "total\t{}\t{}\t{}\tactive_days={}",
            summary.calls, summary.successful, summary.confirmed_sales, summary.active_days
        ),
    )?;
    Ok(())
}

fn build_history_json_payload(range: ActivityRange, days: &[DayActivity]) -> serde_json::Value {
    let summary = summarize_activity(days);
    let days_json = days
        .iter()
        .map(|day| {
            serde_json::json!({
                "date": day.date.to_string(),
                "calls": day.calls,
                "successful": day.successful,
                "confirmed_sales": day.confirmed_sales,
                "intensity": day.intensity,
            })
        })
        .collect::<Vec<_>>();

    serde_json::json!({
        "range": range.label(),
        "days": days_json,
        "summary": {
            "calls": summary.calls,
            "successful": summary.successful,
            "confirmed_sales": summary.confirmed_sales,
            "active_days": summary.active_days,
            "busiest_day": summary.busiest_day.map(|date| date.to_string()),
        }
    })
}

fn format_slot_line(slot: &SlotProgress) -> String {
    let clock = format_description!("[hour]:[minute]");
    format!(
        "{}\t{}-{}\t{}/{}\tcarried={}\t{}",
        slot.slot.period,
        slot.slot.start.format(clock).unwrap_or_default(),
        slot.slot.end.format(clock).unwrap_or_default(),
        slot.sales,
        slot.slot.target,
        slot.carried,
        if slot.is_met() { "met" } else { "open" }
    )
}

fn write_line(out: &mut impl Write, line: &str) -> io::Result<bool> {
    match writeln!(out, "{line}") {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(false),
        Err(error) => Err(error),
    }
}
