use crate::domain::{CallRecord, OutcomeCode};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, Duration, OffsetDateTime};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActivityRange {
    Week,
    Month,
    Quarter,
    Year,
}

impl ActivityRange {
    pub fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            // Twelve full weeks.
            Self::Quarter => 84,
            Self::Year => 365,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown activity range: {0} (expected week|month|quarter|year)")]
pub struct UnknownActivityRangeError(pub String);

impl FromStr for ActivityRange {
    type Err = UnknownActivityRangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" | "w" => Ok(Self::Week),
            "month" | "m" => Ok(Self::Month),
            "quarter" | "q" => Ok(Self::Quarter),
            "year" | "y" => Ok(Self::Year),
            other => Err(UnknownActivityRangeError(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DayActivity {
    pub date: Date,
    pub calls: usize,
    pub successful: usize,
    pub confirmed_sales: usize,
    /// 0 (no calls) through 4 (more than twenty).
    pub intensity: u8,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ActivitySummary {
    pub calls: usize,
    pub successful: usize,
    pub confirmed_sales: usize,
    pub active_days: usize,
    pub busiest_day: Option<Date>,
}

pub fn intensity_for(calls: usize) -> u8 {
    match calls {
        0 => 0,
        1..=5 => 1,
        6..=10 => 2,
        11..=20 => 3,
        _ => 4,
    }
}

/// One bucket per day, oldest first, ending on `now`'s day inclusive.
///
/// Records are assigned to days at `now`'s offset.
pub fn compute_activity(
    records: &[CallRecord],
    range: ActivityRange,
    now: OffsetDateTime,
) -> Vec<DayActivity> {
    let today = now.date();
    let start = today - Duration::days(range.days() - 1);

    let mut per_day: BTreeMap<Date, (usize, usize, usize)> = BTreeMap::new();
    for record in records {
        let date = record.timestamp.to_offset(now.offset()).date();
        if date < start || date > today {
            continue;
        }
        let entry = per_day.entry(date).or_insert((0, 0, 0));
        entry.0 += 1;
        if record.outcome.is_affirmative() {
            entry.1 += 1;
        }
        if record.outcome == OutcomeCode::ConfirmedSale {
            entry.2 += 1;
        }
    }

    let mut days = Vec::with_capacity(range.days() as usize);
    let mut date = start;
    while date <= today {
        let (calls, successful, confirmed_sales) =
            per_day.get(&date).copied().unwrap_or((0, 0, 0));
        days.push(DayActivity {
            date,
            calls,
            successful,
            confirmed_sales,
            intensity: intensity_for(calls),
        });
        let Some(next) = date.next_day() else {
            break;
        };
        date = next;
    }
    days
}

pub fn summarize_activity(days: &[DayActivity]) -> ActivitySummary {
    let mut summary = ActivitySummary::default();
    let mut busiest: Option<(usize, Date)> = None;
    for day in days {
        summary.calls += day.calls;
        summary.successful += day.successful;
        summary.confirmed_sales += day.confirmed_sales;
        if day.calls == 0 {
            continue;
        }
        summary.active_days += 1;
        if busiest.is_none_or(|(calls, _)| day.calls > calls) {
            busiest = Some((day.calls, day.date));
        }
    }
    summary.busiest_day = busiest.map(|(_, date)| date);
    summary
}
