use crate::domain::{CallRecord, OutcomeCode};
use time::macros::time;
use time::{OffsetDateTime, Time};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SalesSlot {
    pub period: u8,
    pub start: Time,
    pub end: Time,
    pub target: usize,
}

pub const DAILY_SALES_SLOTS: [SalesSlot; 4] = [
    SalesSlot {
        period: 1,
        start: time!(9:00),
        end: time!(10:50),
        target: 2,
    },
    SalesSlot {
        period: 2,
        start: time!(10:50),
        end: time!(12:45),
        target: 1,
    },
    SalesSlot {
        period: 3,
        start: time!(12:45),
        end: time!(15:30),
        target: 1,
    },
    SalesSlot {
        period: 4,
        start: time!(15:30),
        end: time!(17:30),
        target: 1,
    },
];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotProgress {
    pub slot: SalesSlot,
    pub sales: usize,
    /// Sales beyond this slot's target.
    pub overflow: usize,
    /// Earlier overflow credited to this slot, capped at its target.
    pub carried: usize,
}

impl SlotProgress {
    pub fn is_met(&self) -> bool {
        self.sales + self.carried >= self.slot.target
    }
}

/// Confirmed sales on `now`'s day per slot; start inclusive, end exclusive.
///
/// Days and clock times are taken at `now`'s offset.
pub fn compute_daily_sales(records: &[CallRecord], now: OffsetDateTime) -> Vec<SlotProgress> {
    let local_sales = records
        .iter()
        .filter(|record| record.outcome == OutcomeCode::ConfirmedSale)
        .map(|record| record.timestamp.to_offset(now.offset()))
        .filter(|at| at.date() == now.date())
        .map(|at| at.time())
        .collect::<Vec<_>>();

    let mut carried_total = 0usize;
    DAILY_SALES_SLOTS
        .iter()
        .map(|slot| {
            let sales = local_sales
                .iter()
                .filter(|at| **at >= slot.start && **at < slot.end)
                .count();
            let overflow = sales.saturating_sub(slot.target);
            let carried = carried_total.min(slot.target);
            carried_total += overflow;
            SlotProgress {
                slot: *slot,
                sales,
                overflow,
                carried,
            }
        })
        .collect()
}
