mod clock;

pub use clock::*;

use crate::domain::{
    ActivityRange, CallRecord, DayActivity, ImportError, ImportFormat, OutcomeCode, Session,
    SlotProgress, Stats, compute_activity, compute_daily_sales, compute_stats, export_csv,
    normalize_notes, parse_import,
};
use crate::infra::{
    ActiveSession, KeyValueStore, KvError, LoadStateError, SaveStateError, SkippedBlob,
    load_active_session,
    load_historical_records, load_session, save_active_pointer, save_session,
};
use std::collections::HashSet;
use thiserror::Error;
use time::Date;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Kv(#[from] KvError),

    #[error(transparent)]
    Save(#[from] SaveStateError),

    #[error(transparent)]
    Import(#[from] ImportError),
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ImportReport {
    pub imported: usize,
    pub dropped: usize,
}

/// Owns the active session and the historical view over one key-value store.
///
/// Every applied mutation is written through before the call returns and is
/// followed by a historical rebuild, so reads always reflect the last write.
pub struct CallTracker<S: KeyValueStore, C: Clock = SystemClock> {
    kv: S,
    clock: C,
    session: Session,
    historical: Vec<CallRecord>,
    skipped: Vec<SkippedBlob>,
}

impl<S: KeyValueStore, C: Clock> CallTracker<S, C> {
    /// Resumes the persisted active session, or starts a fresh one when it is
    /// missing or unreadable.
    pub fn open(mut kv: S, clock: C) -> Result<Self, TrackerError> {
        let session = match load_active_session(&kv) {
            Ok(Some(ActiveSession {
                session,
                inline: false,
            })) => session,
            Ok(Some(ActiveSession {
                session,
                inline: true,
            })) => migrate_inline_pointer(&mut kv, session)?,
            Ok(None) => begin_session(&mut kv, &clock)?,
            Err(LoadStateError::Kv(error)) => return Err(error.into()),
            Err(error @ LoadStateError::Malformed { .. }) => {
                tracing::warn!(%error, "starting a fresh session");
                begin_session(&mut kv, &clock)?
            }
        };

        let mut tracker = Self {
            kv,
            clock,
            session,
            historical: Vec::new(),
            skipped: Vec::new(),
        };
        tracker.refresh_history()?;
        Ok(tracker)
    }

    pub fn active_session(&self) -> &Session {
        &self.session
    }

    /// Newest first.
    pub fn active_records(&self) -> &[CallRecord] {
        &self.session.records
    }

    pub fn historical_records(&self) -> &[CallRecord] {
        &self.historical
    }

    /// Blobs the last historical rebuild could not read.
    pub fn skipped_blobs(&self) -> &[SkippedBlob] {
        &self.skipped
    }

    pub fn stats(&self) -> Stats {
        compute_stats(&self.session.records)
    }

    pub fn today(&self) -> Date {
        self.clock.now().date()
    }

    /// Closes the current session and makes a new, empty one active.
    pub fn start_new_session(&mut self) -> Result<&Session, TrackerError> {
        let mut closed = self.session.clone();
        closed.end_time = Some(self.clock.now());
        save_session(&mut self.kv, &closed)?;

        self.session = begin_session(&mut self.kv, &self.clock)?;
        tracing::debug!(
            closed = %closed.id,
            active = %self.session.id,
            "started new session"
        );
        self.refresh_history()?;
        Ok(&self.session)
    }

    pub fn add_record(
        &mut self,
        outcome: OutcomeCode,
        notes: Option<&str>,
    ) -> Result<CallRecord, TrackerError> {
        let record = CallRecord {
            id: new_id("call"),
            outcome,
            timestamp: self.clock.now(),
            notes: normalize_notes(notes),
        };

        let mut next = self.session.clone();
        next.records.insert(0, record.clone());
        self.commit(next)?;
        tracing::debug!(id = %record.id, %outcome, "added record");
        Ok(record)
    }

    /// Returns `false` without writing anything when `id` is not in the active session.
    pub fn update_record(
        &mut self,
        id: &str,
        outcome: OutcomeCode,
        notes: Option<&str>,
    ) -> Result<bool, TrackerError> {
        let Some(index) = self.position(id) else {
            tracing::debug!(%id, "update skipped: record not found");
            return Ok(false);
        };

        let mut next = self.session.clone();
        let record = &mut next.records[index];
        record.outcome = outcome;
        record.notes = normalize_notes(notes);
        self.commit(next)?;
        tracing::debug!(%id, %outcome, "updated record");
        Ok(true)
    }

    /// Returns `false` without writing anything when `id` is not in the active session.
    pub fn delete_record(&mut self, id: &str) -> Result<bool, TrackerError> {
        let Some(index) = self.position(id) else {
            tracing::debug!(%id, "delete skipped: record not found");
            return Ok(false);
        };

        let mut next = self.session.clone();
        next.records.remove(index);
        self.commit(next)?;
        tracing::debug!(%id, "deleted record");
        Ok(true)
    }

    /// Merges an external payload at the front of the active session.
    ///
    /// Rows that cannot be validated are dropped and counted. Only a payload
    /// that is unrecognizable as a whole fails, and then nothing changes.
    pub fn import_from_text(
        &mut self,
        content: &str,
        format: ImportFormat,
    ) -> Result<ImportReport, TrackerError> {
        let batch = parse_import(content, format, self.clock.now())?;
        let mut report = ImportReport {
            imported: 0,
            dropped: batch.dropped,
        };

        let mut seen: HashSet<String> = self
            .session
            .records
            .iter()
            .map(|record| record.id.clone())
            .collect();
        let mut accepted = Vec::with_capacity(batch.records.len());
        for imported in batch.records {
            let id = imported.id.unwrap_or_else(|| new_id("imported"));
            if !seen.insert(id.clone()) {
                tracing::debug!(%id, "dropping imported record with duplicate id");
                report.dropped += 1;
                continue;
            }
            accepted.push(CallRecord {
                id,
                outcome: imported.outcome,
                timestamp: imported.timestamp,
                notes: imported.notes,
            });
        }

        report.imported = accepted.len();
        if accepted.is_empty() {
            return Ok(report);
        }

        let mut next = self.session.clone();
        accepted.extend(next.records);
        next.records = accepted;
        self.commit(next)?;
        tracing::debug!(
            %format,
            imported = report.imported,
            dropped = report.dropped,
            "imported records"
        );
        Ok(report)
    }

    /// Today's active records as CSV; `None` when there are none.
    pub fn export_today_csv(&self) -> Option<String> {
        export_csv(&self.session.records, self.clock.now())
    }

    pub fn activity(&self, range: ActivityRange) -> Vec<DayActivity> {
        compute_activity(&self.historical, range, self.clock.now())
    }

    /// Today's sales slots, counted across every session.
    pub fn daily_sales(&self) -> Vec<SlotProgress> {
        compute_daily_sales(&self.historical, self.clock.now())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.session.records.iter().position(|record| record.id == id)
    }

    /// Writes `next` first; memory only changes once the write succeeded.
    fn commit(&mut self, next: Session) -> Result<(), TrackerError> {
        save_session(&mut self.kv, &next)?;
        self.session = next;
        self.refresh_history()
    }

    fn refresh_history(&mut self) -> Result<(), TrackerError> {
        let load = load_historical_records(&self.kv)?;
        self.historical = load.records;
        self.skipped = load.skipped;
        Ok(())
    }
}

fn begin_session<S: KeyValueStore, C: Clock>(kv: &mut S, clock: &C) -> Result<Session, TrackerError> {
    let session = Session::new(new_id("session"), clock.now());
    save_session(kv, &session)?;
    save_active_pointer(kv, &session.id)?;
    Ok(session)
}

/// Rewrites a pointer that holds a whole session into the id form. A stored
/// `session-<id>` blob takes precedence over the inline copy.
fn migrate_inline_pointer<S: KeyValueStore>(kv: &mut S, inline: Session) -> Result<Session, TrackerError> {
    let session = match load_session(&*kv, &inline.id) {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            save_session(kv, &inline)?;
            inline
        }
        Err(LoadStateError::Kv(error)) => return Err(error.into()),
        Err(error @ LoadStateError::Malformed { .. }) => {
            tracing::warn!(%error, "replacing unreadable blob with the inline active session");
            save_session(kv, &inline)?;
            inline
        }
    };
    save_active_pointer(kv, &session.id)?;
    tracing::info!(session = %session.id, "migrated inline active session pointer");
    Ok(session)
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::now_v7())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{ACTIVE_SESSION_KEY, MemoryStore, session_key};
    use std::cell::Cell;
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};

    /// Advances one second per reading so timestamps are distinct and ordered.
    struct TickingClock {
        next: Cell<OffsetDateTime>,
    }

    impl TickingClock {
        fn starting_at(at: OffsetDateTime) -> Self {
            Self {
                next: Cell::new(at),
            }
        }
    }

    impl Clock for TickingClock {
        fn now(&self) -> OffsetDateTime {
            let now = self.next.get();
            self.next.set(now + Duration::seconds(1));
            now
        }
    }

    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: bool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, KvError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
            if self.fail_writes {
                return Err(KvError::Query(rusqlite::Error::InvalidQuery));
            }
            self.inner.set(key, value)
        }
    }

    const START: OffsetDateTime = datetime!(2026-03-02 09:00 UTC);

    fn tracker() -> CallTracker<MemoryStore, TickingClock> {
        CallTracker::open(MemoryStore::new(), TickingClock::starting_at(START)).expect("open")
    }

    fn assert_counts_match(tracker: &CallTracker<MemoryStore, TickingClock>) {
        let stats = tracker.stats();
        let sum: usize = stats.outcome_counts.values().sum();
        assert_eq!(sum, stats.total_calls);
        assert_eq!(stats.total_calls, tracker.active_records().len());
    }

    #[test]
    fn opening_empty_store_starts_one_active_session() {
        let tracker = tracker();
        assert!(tracker.active_records().is_empty());
        assert!(tracker.active_session().id.starts_with("session-"));
        assert_eq!(tracker.active_session().end_time, None);
        assert!(tracker.historical_records().is_empty());
    }

    #[test]
    fn add_prepends_and_counts_stay_consistent() {
        let mut tracker = tracker();
        let first = tracker.add_record(OutcomeCode::No, None).expect("add");
        assert_counts_match(&tracker);
        let second = tracker
            .add_record(OutcomeCode::ConfirmedSale, Some("  card  "))
            .expect("add");
        assert_counts_match(&tracker);

        assert_ne!(first.id, second.id);
        assert_eq!(tracker.active_records()[0].id, second.id);
        assert_eq!(tracker.active_records()[0].notes.as_deref(), Some("card"));
        assert_eq!(tracker.active_records()[1].id, first.id);
        assert!(tracker.active_records()[0].timestamp > tracker.active_records()[1].timestamp);
    }

    #[test]
    fn update_replaces_outcome_and_notes_only() {
        let mut tracker = tracker();
        let original = tracker
            .add_record(OutcomeCode::YesNeedsConfirmation, Some("maybe"))
            .expect("add");

        let updated = tracker
            .update_record(&original.id, OutcomeCode::ConfirmedSale, None)
            .expect("update");
        assert!(updated);
        assert_counts_match(&tracker);

        let record = &tracker.active_records()[0];
        assert_eq!(record.id, original.id);
        assert_eq!(record.timestamp, original.timestamp);
        assert_eq!(record.outcome, OutcomeCode::ConfirmedSale);
        assert_eq!(record.notes, None);
        assert_eq!(tracker.stats().confirmed_sales, 1);
    }

    #[test]
    fn update_and_delete_of_unknown_id_are_no_ops() {
        let mut tracker = tracker();
        tracker.add_record(OutcomeCode::Hangup, None).expect("add");
        let before = tracker.active_records().to_vec();

        assert!(!tracker
            .update_record("missing", OutcomeCode::No, Some("x"))
            .expect("update"));
        assert!(!tracker.delete_record("missing").expect("delete"));
        assert_eq!(tracker.active_records(), before.as_slice());
    }

    #[test]
    fn delete_removes_exactly_the_matching_record() {
        let mut tracker = tracker();
        let a = tracker.add_record(OutcomeCode::No, None).expect("a");
        let b = tracker.add_record(OutcomeCode::Hangup, None).expect("b");
        let c = tracker.add_record(OutcomeCode::Dnc, None).expect("c");

        assert!(tracker.delete_record(&b.id).expect("delete"));
        assert_counts_match(&tracker);
        let ids = tracker
            .active_records()
            .iter()
            .map(|record| record.id.clone())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![c.id, a.id]);
        assert_eq!(tracker.historical_records().len(), 2);
    }

    #[test]
    fn mutations_are_visible_in_history_immediately() {
        let mut tracker = tracker();
        let record = tracker.add_record(OutcomeCode::CallLater, None).expect("add");
        assert_eq!(tracker.historical_records(), std::slice::from_ref(&record));

        tracker
            .update_record(&record.id, OutcomeCode::CallIn2Months, None)
            .expect("update");
        assert_eq!(
            tracker.historical_records()[0].outcome,
            OutcomeCode::CallIn2Months
        );
    }

    #[test]
    fn new_session_empties_active_list_but_keeps_history() {
        let mut tracker = tracker();
        let old_session = tracker.active_session().id.clone();
        tracker.add_record(OutcomeCode::ConfirmedSale, None).expect("add");
        tracker.add_record(OutcomeCode::No, None).expect("add");

        let new_session = tracker.start_new_session().expect("new").id.clone();
        assert_ne!(old_session, new_session);
        assert!(tracker.active_records().is_empty());
        assert_eq!(tracker.stats().total_calls, 0);
        assert_eq!(tracker.historical_records().len(), 2);

        tracker.add_record(OutcomeCode::Hangup, None).expect("add");
        assert_eq!(tracker.historical_records().len(), 3);
        assert_eq!(tracker.historical_records()[0].outcome, OutcomeCode::Hangup);

        let closed = load_session(&tracker.kv, &old_session)
            .expect("load")
            .expect("present");
        assert!(closed.end_time.is_some());
        assert_eq!(closed.records.len(), 2);
    }

    #[test]
    fn reopening_resumes_the_active_session() {
        let mut tracker = tracker();
        let record = tracker.add_record(OutcomeCode::No, Some("later")).expect("add");
        let session_id = tracker.active_session().id.clone();
        let kv = tracker.kv;

        let reopened =
            CallTracker::open(kv, TickingClock::starting_at(START + Duration::hours(1)))
                .expect("reopen");
        assert_eq!(reopened.active_session().id, session_id);
        assert_eq!(reopened.active_records(), std::slice::from_ref(&record));
    }

    #[test]
    fn corrupt_active_session_falls_back_to_fresh_session() {
        let mut kv = MemoryStore::new();
        kv.set(ACTIVE_SESSION_KEY, "{garbage").expect("set");

        let tracker = CallTracker::open(kv, TickingClock::starting_at(START)).expect("open");
        assert!(tracker.active_records().is_empty());
        let pointer = tracker.kv.get(ACTIVE_SESSION_KEY).expect("get").expect("pointer");
        assert_eq!(pointer, format!("\"{}\"", tracker.active_session().id));
    }

    #[test]
    fn inline_legacy_active_session_is_migrated() {
        let mut kv = MemoryStore::new();
        kv.set(
            ACTIVE_SESSION_KEY,
            r#"{"id":"session-1","startTime":"2025-06-01T08:00:00.000Z","calls":[
                {"id":"call-1","outcome":"confirmed-sale","timestamp":"2025-06-01T08:10:00.000Z"}
            ]}"#,
        )
        .expect("set");

        let tracker = CallTracker::open(kv, TickingClock::starting_at(START)).expect("open");
        assert_eq!(tracker.active_session().id, "session-1");
        assert_eq!(tracker.active_records().len(), 1);
        assert_eq!(tracker.historical_records().len(), 1);
        assert!(tracker.kv.get(&session_key("session-1")).expect("get").is_some());
        let pointer = tracker.kv.get(ACTIVE_SESSION_KEY).expect("get").expect("pointer");
        assert_eq!(pointer, "\"session-1\"");
    }

    #[test]
    fn inline_pointer_with_stored_blob_is_rewritten_to_id_form() {
        let mut kv = MemoryStore::new();
        kv.set(
            &session_key("session-1"),
            r#"{"id":"session-1","startTime":"2025-06-01T08:00:00Z","records":[
                {"id":"call-2","outcome":"no","timestamp":"2025-06-01T08:20:00Z"},
                {"id":"call-1","outcome":"confirmed-sale","timestamp":"2025-06-01T08:10:00Z"}
            ]}"#,
        )
        .expect("set");
        kv.set(
            ACTIVE_SESSION_KEY,
            r#"{"id":"session-1","startTime":"2025-06-01T08:00:00Z","calls":[
                {"id":"call-1","outcome":"confirmed-sale","timestamp":"2025-06-01T08:10:00Z"}
            ]}"#,
        )
        .expect("set");

        let tracker = CallTracker::open(kv, TickingClock::starting_at(START)).expect("open");
        assert_eq!(tracker.active_records().len(), 2);
        let pointer = tracker.kv.get(ACTIVE_SESSION_KEY).expect("get").expect("pointer");
        assert_eq!(pointer, "\"session-1\"");
    }

    #[test]
    fn mutations_keep_stored_records_that_cannot_be_read() {
        let mut kv = MemoryStore::new();
        kv.set(
            &session_key("s1"),
            r#"{"id":"s1","startTime":"2026-03-02T08:00:00Z","records":[
                {"id":"c1","outcome":"voicemail","timestamp":"2026-03-02T08:05:00Z"},
                {"id":"c2","outcome":"no","timestamp":"2026-03-02T08:04:00Z"}
            ]}"#,
        )
        .expect("set");
        kv.set(ACTIVE_SESSION_KEY, "\"s1\"").expect("set");

        let mut tracker = CallTracker::open(kv, TickingClock::starting_at(START)).expect("open");
        assert_eq!(tracker.active_records().len(), 1);
        tracker.add_record(OutcomeCode::No, None).expect("add");

        let raw = tracker.kv.get(&session_key("s1")).expect("get").expect("blob");
        assert!(raw.contains(r#""id":"c1""#));
        assert!(raw.contains(r#""outcome":"voicemail""#));
        assert!(raw.contains(r#""id":"c2""#));
    }

    #[test]
    fn failed_write_leaves_active_session_untouched() {
        let mut tracker =
            CallTracker::open(FlakyStore::default(), TickingClock::starting_at(START))
                .expect("open");
        let kept = tracker.add_record(OutcomeCode::No, None).expect("add");

        tracker.kv.fail_writes = true;
        assert!(tracker.add_record(OutcomeCode::Hangup, None).is_err());
        assert!(tracker.delete_record(&kept.id).is_err());
        assert_eq!(tracker.active_records(), std::slice::from_ref(&kept));
    }

    #[test]
    fn json_import_merges_at_front() {
        let mut tracker = tracker();
        let existing = tracker.add_record(OutcomeCode::Hangup, None).expect("add");

        let report = tracker
            .import_from_text(
                r#"{"calls":[{"outcome":"no","timestamp":"2024-01-01T10:00:00Z"}]}"#,
                ImportFormat::Json,
            )
            .expect("import");
        assert_eq!(report, ImportReport { imported: 1, dropped: 0 });
        assert_eq!(tracker.active_records().len(), 2);
        assert_eq!(tracker.active_records()[0].outcome, OutcomeCode::No);
        assert_eq!(
            tracker.active_records()[0].timestamp,
            datetime!(2024-01-01 10:00 UTC)
        );
        assert!(tracker.active_records()[0].id.starts_with("imported-"));
        assert_eq!(tracker.active_records()[1], existing);
        assert_counts_match(&tracker);
    }

    #[test]
    fn import_drops_only_the_item_with_an_unstorable_timestamp() {
        let mut tracker = tracker();
        let report = tracker
            .import_from_text(
                r#"[{"outcome":"no","timestamp":"2024-01-01T10:00:00Z"},
                    {"outcome":"hangup","timestamp":-62200000000000}]"#,
                ImportFormat::Json,
            )
            .expect("import");
        assert_eq!(report, ImportReport { imported: 1, dropped: 1 });
        assert_eq!(tracker.active_records().len(), 1);
        assert_eq!(tracker.active_records()[0].outcome, OutcomeCode::No);
    }

    #[test]
    fn csv_round_trip_keeps_multi_line_notes() {
        let mut source = tracker();
        source
            .add_record(OutcomeCode::ConfirmedSale, Some("line one\nline two"))
            .expect("add");
        let csv = source.export_today_csv().expect("csv");

        let mut target = tracker();
        let report = target
            .import_from_text(&csv, ImportFormat::Csv)
            .expect("import");
        assert_eq!(report, ImportReport { imported: 1, dropped: 0 });
        assert_eq!(
            target.active_records()[0].notes.as_deref(),
            Some("line one\nline two")
        );
    }

    #[test]
    fn malformed_json_import_changes_nothing() {
        let mut tracker = tracker();
        tracker.add_record(OutcomeCode::No, None).expect("add");
        let before = tracker.active_records().to_vec();

        let error = tracker
            .import_from_text("{\"calls\": [", ImportFormat::Json)
            .expect_err("malformed");
        assert!(matches!(
            error,
            TrackerError::Import(ImportError::InvalidPayload(_))
        ));
        assert_eq!(tracker.active_records(), before.as_slice());
    }

    #[test]
    fn import_keeps_ids_and_drops_duplicates() {
        let mut tracker = tracker();
        let payload = r#"[
            {"id":"keep","outcome":"dnc","timestamp":"2026-03-01T08:00:00Z"},
            {"id":"keep","outcome":"no","timestamp":"2026-03-01T08:01:00Z"},
            {"outcome":"absolutely-no","timestamp":"2026-03-01T08:02:00Z"}
        ]"#;
        let report = tracker
            .import_from_text(payload, ImportFormat::Json)
            .expect("import");
        assert_eq!(report, ImportReport { imported: 2, dropped: 1 });
        assert_eq!(tracker.active_records()[0].id, "keep");
        assert_eq!(tracker.active_records()[0].outcome, OutcomeCode::Dnc);

        let again = tracker
            .import_from_text(payload, ImportFormat::Json)
            .expect("import again");
        assert_eq!(again.imported, 1);
        assert_eq!(tracker.active_records().len(), 3);
    }

    #[test]
    fn csv_export_round_trips_outcomes_and_notes() {
        let mut source = tracker();
        source
            .add_record(OutcomeCode::ConfirmedSale, Some("two boxes, paid"))
            .expect("add");
        source
            .add_record(OutcomeCode::AbsolutelyNo, Some("said \"never\""))
            .expect("add");
        source.add_record(OutcomeCode::Dnc, None).expect("add");
        source.add_record(OutcomeCode::NotEnoughMoney, None).expect("add");
        let csv = source.export_today_csv().expect("csv");

        let mut target = tracker();
        let report = target
            .import_from_text(&csv, ImportFormat::Csv)
            .expect("import");
        assert_eq!(report, ImportReport { imported: 4, dropped: 0 });

        let pairs = |records: &[CallRecord]| {
            let mut pairs = records
                .iter()
                .map(|record| (record.outcome, record.notes.clone()))
                .collect::<Vec<_>>();
            pairs.sort();
            pairs
        };
        assert_eq!(pairs(target.active_records()), pairs(source.active_records()));
        assert!(target
            .active_records()
            .iter()
            .all(|record| record.timestamp.date() == START.date()));
    }

    #[test]
    fn activity_and_slots_read_from_history() {
        let mut tracker = tracker();
        tracker.add_record(OutcomeCode::ConfirmedSale, None).expect("add");
        tracker.start_new_session().expect("new");
        tracker.add_record(OutcomeCode::ConfirmedSale, None).expect("add");

        let days = tracker.activity(ActivityRange::Week);
        assert_eq!(days.len(), 7);
        assert_eq!(days[6].calls, 2);
        assert_eq!(days[6].confirmed_sales, 2);

        let slots = tracker.daily_sales();
        assert_eq!(slots[0].sales, 2);
    }
}
