use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum OutcomeCode {
    YesNeedsConfirmation,
    ConfirmedSale,
    No,
    AbsolutelyNo,
    Hangup,
    CallLater,
    CallIn2Months,
    SicknessMedicine,
    AlreadyCustomer,
    NotEnoughMoney,
    LanguageDifficulties,
    WrongNumber,
    Dnc,
}

impl OutcomeCode {
    pub const ALL: [OutcomeCode; 13] = [
        Self::YesNeedsConfirmation,
        Self::ConfirmedSale,
        Self::No,
        Self::AbsolutelyNo,
        Self::Hangup,
        Self::CallLater,
        Self::CallIn2Months,
        Self::SicknessMedicine,
        Self::AlreadyCustomer,
        Self::NotEnoughMoney,
        Self::LanguageDifficulties,
        Self::WrongNumber,
        Self::Dnc,
    ];

    /// Stable wire code used in persisted blobs and JSON imports.
    pub fn code(self) -> &'static str {
        match self {
            Self::YesNeedsConfirmation => "yes-needs-confirmation",
            Self::ConfirmedSale => "confirmed-sale",
            Self::No => "no",
            Self::AbsolutelyNo => "absolutely-no",
            Self::Hangup => "hangup",
            Self::CallLater => "call-later",
            Self::CallIn2Months => "call-in-2-months",
            Self::SicknessMedicine => "sickness-medicine",
            Self::AlreadyCustomer => "already-customer",
            Self::NotEnoughMoney => "not-enough-money",
            Self::LanguageDifficulties => "language-difficulties",
            Self::WrongNumber => "wrong-number",
            Self::Dnc => "dnc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::YesNeedsConfirmation => "Yes (Needs Confirmation)",
            Self::ConfirmedSale => "Confirmed Sale",
            Self::No => "No",
            Self::AbsolutelyNo => "Absolutely No",
            Self::Hangup => "Hangup",
            Self::CallLater => "Call Later",
            Self::CallIn2Months => "Call in 2 Months",
            Self::SicknessMedicine => "Sickness/Medicine",
            Self::AlreadyCustomer => "Already a Customer",
            Self::NotEnoughMoney => "Not Enough Money",
            Self::LanguageDifficulties => "Language Difficulties",
            Self::WrongNumber => "Wrong Number",
            Self::Dnc => "DNC (Do Not Call)",
        }
    }

    /// Pending or confirmed yes.
    pub fn is_affirmative(self) -> bool {
        matches!(self, Self::YesNeedsConfirmation | Self::ConfirmedSale)
    }

    /// Affirmative or a plain no; hangups and the like are not engagement.
    pub fn is_engaged(self) -> bool {
        self.is_affirmative() || self == Self::No
    }

    /// Case-insensitive substring match against codes and labels.
    ///
    /// `"Absolutely No"` contains both `no` and `absolutely no`, so the
    /// outcome with the longest matching needle wins.
    pub fn match_label(text: &str) -> Option<OutcomeCode> {
        let haystack = text.trim().to_lowercase();
        if haystack.is_empty() {
            return None;
        }

        let mut best: Option<(usize, OutcomeCode)> = None;
        for outcome in Self::ALL {
            let label = outcome.label().to_lowercase();
            for needle in [outcome.code(), label.as_str()] {
                if !haystack.contains(needle) {
                    continue;
                }
                let len = needle.len();
                if best.is_none_or(|(best_len, _)| len > best_len) {
                    best = Some((len, outcome));
                }
            }
        }
        best.map(|(_, outcome)| outcome)
    }
}

impl fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("unknown outcome: {0}")]
pub struct UnknownOutcomeError(pub String);

impl FromStr for OutcomeCode {
    type Err = UnknownOutcomeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|outcome| outcome.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownOutcomeError(trimmed.to_string()))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallRecord {
    pub id: String,
    pub outcome: OutcomeCode,
    pub timestamp: OffsetDateTime,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    pub id: String,
    /// Newest first.
    pub records: Vec<CallRecord>,
    pub start_time: OffsetDateTime,
    pub end_time: Option<OffsetDateTime>,
    /// Stored record entries that could not be read; written back unchanged.
    pub unreadable: Vec<serde_json::Value>,
}

impl Session {
    pub fn new(id: String, start_time: OffsetDateTime) -> Self {
        Self {
            id,
            records: Vec::new(),
            start_time,
            end_time: None,
            unreadable: Vec::new(),
        }
    }
}

/// Blank notes are stored as absent.
pub fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
