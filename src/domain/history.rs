use crate::domain::CallRecord;
use std::collections::HashMap;

/// Deduplicates by record id and orders newest first.
///
/// Input order is load order. A later occurrence of an id replaces the
/// earlier one in place, so the surviving copy is always the last one seen.
/// Records with equal timestamps keep their load order.
pub fn merge_historical_records(records: impl IntoIterator<Item = CallRecord>) -> Vec<CallRecord> {
    let mut merged: Vec<CallRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in records {
        match positions.get(&record.id) {
            Some(&index) => merged[index] = record,
            None => {
                positions.insert(record.id.clone(), merged.len());
                merged.push(record);
            }
        }
    }

    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged
}
