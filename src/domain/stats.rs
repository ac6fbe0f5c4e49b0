use crate::domain::{CallRecord, OutcomeCode};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub total_calls: usize,
    pub confirmed_sales: usize,
    /// Percent of engaged calls that were affirmative.
    pub yes_ratio: f64,
    /// Percent of all calls that were engaged.
    pub engagement_ratio: f64,
    /// Holds every outcome, including those with zero calls.
    pub outcome_counts: BTreeMap<OutcomeCode, usize>,
}

impl Stats {
    pub fn count(&self, outcome: OutcomeCode) -> usize {
        self.outcome_counts.get(&outcome).copied().unwrap_or(0)
    }
}

pub fn compute_stats(records: &[CallRecord]) -> Stats {
    let mut outcome_counts: BTreeMap<OutcomeCode, usize> =
        OutcomeCode::ALL.into_iter().map(|code| (code, 0)).collect();

    let mut affirmative = 0usize;
    let mut engaged = 0usize;
    for record in records {
        *outcome_counts.entry(record.outcome).or_insert(0) += 1;
        if record.outcome.is_affirmative() {
            affirmative += 1;
        }
        if record.outcome.is_engaged() {
            engaged += 1;
        }
    }

    let total_calls = records.len();
    let mut stats = Stats {
        total_calls,
        confirmed_sales: 0,
        yes_ratio: percent(affirmative, engaged),
        engagement_ratio: percent(engaged, total_calls),
        outcome_counts,
    };
    stats.confirmed_sales = stats.count(OutcomeCode::ConfirmedSale);
    stats
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
