use crate::domain::CallRecord;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

pub const CSV_HEADER: &str = "Time,Outcome,Notes";

/// Records from `now`'s calendar day as `Time,Outcome,Notes` CSV, in the order given.
///
/// Days and clock times are taken at `now`'s offset. Returns `None` when no
/// record falls on that day.
pub fn export_csv(records: &[CallRecord], now: OffsetDateTime) -> Option<String> {
    let offset = now.offset();
    let rows = records
        .iter()
        .map(|record| (record, record.timestamp.to_offset(offset)))
        .filter(|(_, local)| local.date() == now.date())
        .map(|(record, local)| format_csv_row(record, local))
        .collect::<Vec<_>>();
    if rows.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(rows);
    Some(lines.join("\n"))
}

pub fn export_file_name(today: Date) -> String {
    format!(
        "calls-{:04}-{:02}-{:02}.csv",
        today.year(),
        u8::from(today.month()),
        today.day()
    )
}

fn format_csv_row(record: &CallRecord, local: OffsetDateTime) -> String {
    let notes = record.notes.as_deref().unwrap_or("").replace('"', "\"\"");
    [
        format_clock_time(local),
        record.outcome.label().to_string(),
        format!("\"{notes}\""),
    ]
    .join(",")
}

pub fn format_clock_time(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(format_description!(
            "[hour repr:12 padding:none]:[minute]:[second] [period]"
        ))
        .unwrap_or_else(|_| timestamp.time().to_string())
}

/// Parses `h:mm[:ss] AM|PM`. Without a suffix the hour is read as 24-hour.
pub fn parse_clock_time(value: &str) -> Option<Time> {
    let trimmed = value.trim();
    let (clock, period) = match trimmed.rsplit_once(char::is_whitespace) {
        Some((clock, suffix)) => (clock.trim(), Some(suffix.to_ascii_uppercase())),
        None => (trimmed, None),
    };

    let mut parts = clock.split(':');
    let hour = parts.next()?.trim().parse::<u8>().ok()?;
    let minute = parts.next()?.trim().parse::<u8>().ok()?;
    let second = match parts.next() {
        Some(raw) => raw.trim().parse::<u8>().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let hour = match period.as_deref() {
        Some("AM") if (1..=12).contains(&hour) => hour % 12,
        Some("PM") if (1..=12).contains(&hour) => hour % 12 + 12,
        Some(_) => return None,
        None => hour,
    };
    Time::from_hms(hour, minute, second).ok()
}

/// Resolves a clock time against the calendar date and offset of `now`.
pub fn clock_time_on(now: OffsetDateTime, time: Time) -> OffsetDateTime {
    PrimitiveDateTime::new(now.date(), time).assume_offset(now.offset())
}

/// Splits CSV text into records. Line breaks inside a quoted field stay part
/// of the record; a trailing `\r` is stripped from each record.
pub fn split_csv_records(content: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in content.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '\n' if !in_quotes => {
                let record = std::mem::take(&mut current);
                records.push(record.trim_end_matches('\r').to_string());
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        records.push(current.trim_end_matches('\r').to_string());
    }
    records
}

/// Splits one CSV record, honouring double-quoted fields and `""` escapes.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                let _ = chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
