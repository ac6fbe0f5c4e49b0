use crate::domain::{
    OutcomeCode, clock_time_on, normalize_notes, parse_clock_time, split_csv_line,
    split_csv_records,
};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ImportFormat {
    type Err = ImportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid import payload: {0}")]
    InvalidPayload(String),

    #[error("unsupported import format: {0}")]
    UnsupportedFormat(String),
}

/// A validated record that has not been assigned to a session yet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImportedRecord {
    /// Present only when the payload carried one.
    pub id: Option<String>,
    pub outcome: OutcomeCode,
    pub timestamp: OffsetDateTime,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ImportBatch {
    pub records: Vec<ImportedRecord>,
    pub dropped: usize,
}

pub fn parse_import(
    content: &str,
    format: ImportFormat,
    now: OffsetDateTime,
) -> Result<ImportBatch, ImportError> {
    match format {
        ImportFormat::Csv => Ok(parse_csv_import(content, now)),
        ImportFormat::Json => parse_json_import(content),
    }
}

/// Every row is dated `now`'s calendar day; the export format carries no date.
pub fn parse_csv_import(content: &str, now: OffsetDateTime) -> ImportBatch {
    let lines = split_csv_records(content.trim());
    if lines.len() < 2 {
        return ImportBatch::default();
    }

    let mut batch = ImportBatch::default();
    for line in lines.iter().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_csv_row(line, now) {
            Some(record) => batch.records.push(record),
            None => {
                tracing::debug!(line = %line, "dropping unreadable csv row");
                batch.dropped += 1;
            }
        }
    }
    batch
}

fn parse_csv_row(line: &str, now: OffsetDateTime) -> Option<ImportedRecord> {
    let fields = split_csv_line(line);
    if fields.len() < 2 {
        return None;
    }

    let time = parse_clock_time(&fields[0])?;
    let outcome = OutcomeCode::match_label(&fields[1])?;
    let notes = normalize_notes(fields.get(2).map(String::as_str));

    Some(ImportedRecord {
        id: None,
        outcome,
        timestamp: storable(clock_time_on(now, time))?,
        notes,
    })
}

/// Accepts a bare array of records or an object with a `records` (or `calls`) array.
pub fn parse_json_import(content: &str) -> Result<ImportBatch, ImportError> {
    let parsed: Value = serde_json::from_str(content)
        .map_err(|error| ImportError::InvalidPayload(error.to_string()))?;

    let items = match &parsed {
        Value::Array(items) => items,
        Value::Object(map) => ["records", "calls"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .ok_or_else(|| {
                ImportError::InvalidPayload("expected a `records` array".to_string())
            })?,
        _ => {
            return Err(ImportError::InvalidPayload(
                "expected an array or an object".to_string(),
            ));
        }
    };

    let mut batch = ImportBatch::default();
    for item in items {
        match parse_json_item(item) {
            Some(record) => batch.records.push(record),
            None => batch.dropped += 1,
        }
    }
    Ok(batch)
}

fn parse_json_item(item: &Value) -> Option<ImportedRecord> {
    let outcome_raw = item.get("outcome").and_then(Value::as_str)?;
    let outcome = match outcome_raw.parse::<OutcomeCode>() {
        Ok(outcome) => outcome,
        Err(error) => {
            tracing::debug!(%error, "dropping imported record");
            return None;
        }
    };
    let timestamp = parse_timestamp_value(item.get("timestamp")?)?;

    let id = item
        .get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    let notes = normalize_notes(item.get("notes").and_then(Value::as_str));

    Some(ImportedRecord {
        id,
        outcome,
        timestamp,
        notes,
    })
}

/// RFC 3339 text or integer Unix milliseconds.
///
/// Instants that cannot be written back as RFC 3339 (years outside
/// 0000..=9999, sub-minute offsets) are rejected.
pub fn parse_timestamp_value(value: &Value) -> Option<OffsetDateTime> {
    let timestamp = match value {
        Value::String(text) => OffsetDateTime::parse(text.trim(), &Rfc3339).ok()?,
        Value::Number(number) => {
            let ms = number.as_i64()?;
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()?
        }
        _ => return None,
    };
    storable(timestamp)
}

fn storable(timestamp: OffsetDateTime) -> Option<OffsetDateTime> {
    if timestamp.format(&Rfc3339).is_err() {
        tracing::debug!(%timestamp, "dropping timestamp that cannot be stored");
        return None;
    }
    Some(timestamp)
}
