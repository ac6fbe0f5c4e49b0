use rusqlite::{Connection, OptionalExtension, params};
#[cfg(test)]
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("failed to create state dir {path}: {source}")]
    CreateStateDir { path: String, source: io::Error },

    #[error("failed to open state DB at {path}: {source}")]
    OpenDb {
        path: String,
        source: rusqlite::Error,
    },

    #[error("failed to query state DB: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Durable string store. Single keys are written atomically; nothing spans keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError>;
}

/// In-process store for tests.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug)]
pub struct SqliteStore {
    db_path: PathBuf,
    conn: Connection,
}

impl SqliteStore {
    pub fn open(db_path: PathBuf) -> Result<Self, KvError> {
        let parent = db_path.parent().unwrap_or(&db_path);
        fs::create_dir_all(parent).map_err(|error| KvError::CreateStateDir {
            path: parent.display().to_string(),
            source: error,
        })?;

        let conn = Connection::open(&db_path).map_err(|error| KvError::OpenDb {
            path: db_path.display().to_string(),
            source: error,
        })?;
        let _ = conn.busy_timeout(Duration::from_millis(250));
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (\
                key TEXT PRIMARY KEY NOT NULL, \
                value TEXT NOT NULL, \
                updated_at_unix_ms INTEGER NOT NULL\
             )",
        )?;

        tracing::debug!(path = %db_path.display(), "opened state db");
        Ok(Self { db_path, conn })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at_unix_ms) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET \
                value = excluded.value, \
                updated_at_unix_ms = excluded.updated_at_unix_ms",
            params![key, value, now_unix_ms()],
        )?;
        Ok(())
    }
}

fn now_unix_ms() -> i64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(nanos).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_store_overwrites_values() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").expect("get"), None);
        store.set("k", "1").expect("set");
        store.set("k", "2").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("2"));
    }

    #[test]
    fn sqlite_store_persists_across_reopen() {
        let dir = tempdir().expect("tempdir");
        let db_path = dir.path().join("nested").join("state.db");

        {
            let mut store = SqliteStore::open(db_path.clone()).expect("open");
            store.set("sessions-index", "[]").expect("set");
            store.set("sessions-index", r#"{"version":2}"#).expect("overwrite");
        }

        let store = SqliteStore::open(db_path).expect("reopen");
        assert_eq!(
            store.get("sessions-index").expect("get").as_deref(),
            Some(r#"{"version":2}"#)
        );
        assert_eq!(store.get("missing").expect("get"), None);
        assert!(store.db_path().ends_with("state.db"));
    }
}
