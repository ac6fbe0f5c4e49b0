use crate::domain::{CallRecord, OutcomeCode, Session, merge_historical_records};
use crate::infra::{KeyValueStore, KvError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const SESSIONS_INDEX_KEY: &str = "sessions-index";
pub const ACTIVE_SESSION_KEY: &str = "active-session";
/// Flat blob of every record, written by the first storage layout. Read only.
pub const LEGACY_HISTORY_KEY: &str = "history";

const CURRENT_INDEX_VERSION: u32 = 2;

pub fn session_key(session_id: &str) -> String {
    format!("session-{session_id}")
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StorageSchema {
    /// v1: all records in the `history` blob.
    FlatHistory,
    /// v2: one blob per session, enumerated by the index.
    PerSession,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionsIndex {
    pub schema: StorageSchema,
    pub session_ids: Vec<String>,
}

#[derive(Debug, Error)]
pub enum LoadStateError {
    #[error(transparent)]
    Kv(#[from] KvError),

    #[error("malformed persisted state at `{key}`: {reason}")]
    Malformed { key: String, reason: String },
}

impl LoadStateError {
    fn malformed(key: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SaveStateError {
    #[error(transparent)]
    Kv(#[from] KvError),

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveSession {
    pub session: Session,
    /// The pointer held the whole session rather than its id.
    pub inline: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SkippedBlob {
    pub key: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HistoricalLoad {
    /// Deduplicated, newest first.
    pub records: Vec<CallRecord>,
    pub skipped: Vec<SkippedBlob>,
}

pub fn load_sessions_index(kv: &dyn KeyValueStore) -> Result<Option<SessionsIndex>, LoadStateError> {
    let Some(raw) = kv.get(SESSIONS_INDEX_KEY)? else {
        return Ok(None);
    };
    let file: SessionsIndexFile = serde_json::from_str(&raw)
        .map_err(|error| LoadStateError::malformed(SESSIONS_INDEX_KEY, error))?;
    file.into_index().map(Some)
}

/// Adds `session_id` to the index, rewriting it in the current version.
pub fn register_session(kv: &mut dyn KeyValueStore, session_id: &str) -> Result<(), SaveStateError> {
    let mut session_ids = match load_sessions_index(kv) {
        Ok(Some(index)) => index.session_ids,
        Ok(None) => Vec::new(),
        Err(LoadStateError::Kv(error)) => return Err(error.into()),
        Err(error @ LoadStateError::Malformed { .. }) => {
            tracing::warn!(%error, "replacing unreadable sessions index");
            Vec::new()
        }
    };

    if session_ids.iter().any(|id| id == session_id) {
        return Ok(());
    }
    session_ids.push(session_id.to_string());

    let file = VersionedIndexFile {
        version: CURRENT_INDEX_VERSION,
        sessions: session_ids,
    };
    kv.set(SESSIONS_INDEX_KEY, &serde_json::to_string(&file)?)?;
    Ok(())
}

pub fn load_session(kv: &dyn KeyValueStore, session_id: &str) -> Result<Option<Session>, LoadStateError> {
    let key = session_key(session_id);
    let Some(raw) = kv.get(&key)? else {
        return Ok(None);
    };
    let blob: SessionBlob =
        serde_json::from_str(&raw).map_err(|error| LoadStateError::malformed(&key, error))?;
    blob.into_session(&key).map(Some)
}

/// Writes the session blob and makes sure the index lists it.
///
/// Record entries the session could not read when loaded are kept after the
/// readable ones.
pub fn save_session(kv: &mut dyn KeyValueStore, session: &Session) -> Result<(), SaveStateError> {
    let blob = SessionBlob::from_session(session)?;
    kv.set(&session_key(&session.id), &serde_json::to_string(&blob)?)?;
    register_session(kv, &session.id)
}

pub fn save_active_pointer(kv: &mut dyn KeyValueStore, session_id: &str) -> Result<(), SaveStateError> {
    let pointer = ActivePointerFile::Id(session_id.to_string());
    kv.set(ACTIVE_SESSION_KEY, &serde_json::to_string(&pointer)?)?;
    Ok(())
}

/// Loads the session the active pointer names.
///
/// The pointer may also hold a whole session object, as earlier builds stored it.
pub fn load_active_session(kv: &dyn KeyValueStore) -> Result<Option<ActiveSession>, LoadStateError> {
    let Some(raw) = kv.get(ACTIVE_SESSION_KEY)? else {
        return Ok(None);
    };
    let pointer: ActivePointerFile = serde_json::from_str(&raw)
        .map_err(|error| LoadStateError::malformed(ACTIVE_SESSION_KEY, error))?;

    match pointer {
        ActivePointerFile::Id(session_id) => match load_session(kv, &session_id)? {
            Some(session) => Ok(Some(ActiveSession {
                session,
                inline: false,
            })),
            None => Err(LoadStateError::malformed(
                ACTIVE_SESSION_KEY,
                format!("points at missing session {session_id}"),
            )),
        },
        ActivePointerFile::Session(blob) => {
            let session = blob.into_session(ACTIVE_SESSION_KEY)?;
            Ok(Some(ActiveSession {
                session,
                inline: true,
            }))
        }
    }
}

/// Rebuilds the cross-session record set, branching on the index schema.
///
/// Unreadable blobs are skipped and reported; only store failures abort.
pub fn load_historical_records(kv: &dyn KeyValueStore) -> Result<HistoricalLoad, KvError> {
    let mut skipped = Vec::new();
    let index = match load_sessions_index(kv) {
        Ok(index) => index,
        Err(LoadStateError::Kv(error)) => return Err(error),
        Err(LoadStateError::Malformed { key, reason }) => {
            tracing::warn!(%key, %reason, "skipping unreadable sessions index");
            skipped.push(SkippedBlob { key, reason });
            None
        }
    };

    let mut loaded: Vec<CallRecord> = Vec::new();
    match load_flat_history(kv) {
        Ok(records) => loaded.extend(records),
        Err(LoadStateError::Kv(error)) => return Err(error),
        Err(LoadStateError::Malformed { key, reason }) => {
            tracing::warn!(%key, %reason, "skipping unreadable history blob");
            skipped.push(SkippedBlob { key, reason });
        }
    }

    let session_ids = match index {
        Some(SessionsIndex {
            schema: StorageSchema::PerSession,
            session_ids,
        }) => session_ids,
        Some(SessionsIndex {
            schema: StorageSchema::FlatHistory,
            ..
        })
        | None => Vec::new(),
    };

    for session_id in &session_ids {
        match load_session(kv, session_id) {
            Ok(Some(session)) => loaded.extend(session.records),
            Ok(None) => {
                let key = session_key(session_id);
                tracing::warn!(%key, "indexed session blob is missing");
                skipped.push(SkippedBlob {
                    key,
                    reason: "missing".to_string(),
                });
            }
            Err(LoadStateError::Kv(error)) => return Err(error),
            Err(LoadStateError::Malformed { key, reason }) => {
                tracing::warn!(%key, %reason, "skipping unreadable session blob");
                skipped.push(SkippedBlob { key, reason });
            }
        }
    }

    Ok(HistoricalLoad {
        records: merge_historical_records(loaded),
        skipped,
    })
}

fn load_flat_history(kv: &dyn KeyValueStore) -> Result<Vec<CallRecord>, LoadStateError> {
    let Some(raw) = kv.get(LEGACY_HISTORY_KEY)? else {
        return Ok(Vec::new());
    };
    let values: Vec<Value> = serde_json::from_str(&raw)
        .map_err(|error| LoadStateError::malformed(LEGACY_HISTORY_KEY, error))?;
    let (records, _) = split_record_values(values, LEGACY_HISTORY_KEY);
    Ok(records)
}

/// Separates readable records from the stored entries that fail to parse.
fn split_record_values(values: Vec<Value>, key: &str) -> (Vec<CallRecord>, Vec<Value>) {
    let mut records = Vec::with_capacity(values.len());
    let mut unreadable = Vec::new();
    for value in values {
        let parsed = serde_json::from_value::<RecordBlob>(value.clone())
            .map_err(|error| error.to_string())
            .and_then(RecordBlob::into_record);
        match parsed {
            Ok(record) => records.push(record),
            Err(reason) => {
                tracing::warn!(%key, %reason, "skipping unreadable record");
                unreadable.push(value);
            }
        }
    }
    (records, unreadable)
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum SessionsIndexFile {
    /// Bare id list, as the browser dashboard wrote it. Read as v2.
    Ids(Vec<String>),
    Versioned(VersionedIndexFile),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct VersionedIndexFile {
    version: u32,
    #[serde(default)]
    sessions: Vec<String>,
}

impl SessionsIndexFile {
    fn into_index(self) -> Result<SessionsIndex, LoadStateError> {
        match self {
            Self::Ids(session_ids) => Ok(SessionsIndex {
                schema: StorageSchema::PerSession,
                session_ids,
            }),
            Self::Versioned(file) => {
                let schema = match file.version {
                    1 => StorageSchema::FlatHistory,
                    2 => StorageSchema::PerSession,
                    other => {
                        return Err(LoadStateError::malformed(
                            SESSIONS_INDEX_KEY,
                            format!("unsupported index version {other}"),
                        ));
                    }
                };
                Ok(SessionsIndex {
                    schema,
                    session_ids: file.sessions,
                })
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ActivePointerFile {
    Id(String),
    Session(SessionBlob),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionBlob {
    id: String,
    start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
    #[serde(default, alias = "calls")]
    records: Vec<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RecordBlob {
    id: String,
    outcome: String,
    timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl SessionBlob {
    fn from_session(session: &Session) -> Result<Self, SaveStateError> {
        let mut records = Vec::with_capacity(session.records.len() + session.unreadable.len());
        for record in &session.records {
            records.push(serde_json::to_value(RecordBlob::from_record(record)?)?);
        }
        records.extend(session.unreadable.iter().cloned());
        Ok(Self {
            id: session.id.clone(),
            start_time: session.start_time.format(&Rfc3339)?,
            end_time: session
                .end_time
                .map(|end| end.format(&Rfc3339))
                .transpose()?,
            records,
        })
    }

    fn into_session(self, key: &str) -> Result<Session, LoadStateError> {
        if self.id.trim().is_empty() {
            return Err(LoadStateError::malformed(key, "empty session id"));
        }
        let start_time = parse_instant(&self.start_time)
            .ok_or_else(|| LoadStateError::malformed(key, "invalid startTime"))?;
        let end_time = match self.end_time.as_deref() {
            Some(raw) => Some(
                parse_instant(raw)
                    .ok_or_else(|| LoadStateError::malformed(key, "invalid endTime"))?,
            ),
            None => None,
        };

        let (records, unreadable) = split_record_values(self.records, key);
        Ok(Session {
            id: self.id,
            records,
            start_time,
            end_time,
            unreadable,
        })
    }
}

impl RecordBlob {
    fn from_record(record: &CallRecord) -> Result<Self, time::error::Format> {
        Ok(Self {
            id: record.id.clone(),
            outcome: record.outcome.code().to_string(),
            timestamp: record.timestamp.format(&Rfc3339)?,
            notes: record.notes.clone(),
        })
    }

    fn into_record(self) -> Result<CallRecord, String> {
        let outcome = self
            .outcome
            .parse::<OutcomeCode>()
            .map_err(|error| format!("record {}: {error}", self.id))?;
        let timestamp = parse_instant(&self.timestamp)
            .ok_or_else(|| format!("record {}: invalid timestamp", self.id))?;
        Ok(CallRecord {
            id: self.id,
            outcome,
            timestamp,
            notes: self.notes,
        })
    }
}

fn parse_instant(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value.trim(), &Rfc3339).ok()
}
