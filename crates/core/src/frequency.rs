//! Recurrence frequencies for maintenance configurations.
//!
//! A configuration's `frequency` column stores one of the labels below
//! verbatim. Date arithmetic goes through `chrono` so month and year steps
//! follow calendar rules: adding a month to the 31st clamps to the last
//! valid day of the target month.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

pub const FREQ_DAILY: &str = "Daily";
pub const FREQ_WEEKLY: &str = "Weekly";
pub const FREQ_MONTHLY: &str = "Monthly";
pub const FREQ_THREE_MONTHS: &str = "3 Months";
pub const FREQ_SIX_MONTHS: &str = "6 Months";
pub const FREQ_ONE_YEAR: &str = "1 Year";

/// All valid frequency labels, shortest interval first.
pub const VALID_FREQUENCIES: &[&str] = &[
    FREQ_DAILY,
    FREQ_WEEKLY,
    FREQ_MONTHLY,
    FREQ_THREE_MONTHS,
    FREQ_SIX_MONTHS,
    FREQ_ONE_YEAR,
];

// ---------------------------------------------------------------------------
// Enum
// ---------------------------------------------------------------------------

/// How often a configuration recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "Daily")]
    Daily,
    #[serde(rename = "Weekly")]
    Weekly,
    #[serde(rename = "Monthly")]
    Monthly,
    #[serde(rename = "3 Months")]
    ThreeMonths,
    #[serde(rename = "6 Months")]
    SixMonths,
    #[serde(rename = "1 Year")]
    OneYear,
}

/// One recurrence step expressed in the unit chrono adds it with.
#[derive(Debug, Clone, Copy)]
enum Step {
    Days(u64),
    Months(u32),
}

impl Frequency {
    /// Return the database label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => FREQ_DAILY,
            Self::Weekly => FREQ_WEEKLY,
            Self::Monthly => FREQ_MONTHLY,
            Self::ThreeMonths => FREQ_THREE_MONTHS,
            Self::SixMonths => FREQ_SIX_MONTHS,
            Self::OneYear => FREQ_ONE_YEAR,
        }
    }

    /// Parse a stored label. Returns `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            FREQ_DAILY => Some(Self::Daily),
            FREQ_WEEKLY => Some(Self::Weekly),
            FREQ_MONTHLY => Some(Self::Monthly),
            FREQ_THREE_MONTHS => Some(Self::ThreeMonths),
            FREQ_SIX_MONTHS => Some(Self::SixMonths),
            FREQ_ONE_YEAR => Some(Self::OneYear),
            _ => None,
        }
    }

    /// Parse from a string, returning a validation error for unknown labels.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        Self::parse(s).ok_or_else(|| {
            CoreError::Validation(format!(
                "Unknown frequency: '{s}'. Valid frequencies: {}",
                VALID_FREQUENCIES.join(", ")
            ))
        })
    }

    /// Upper bound on projected occurrences per configuration.
    ///
    /// Keeps high-frequency schedules from flooding the dashboard.
    pub fn max_occurrences(&self) -> usize {
        match self {
            Self::Daily => 30,
            Self::Weekly => 26,
            Self::Monthly => 12,
            Self::ThreeMonths => 8,
            Self::SixMonths => 6,
            Self::OneYear => 3,
        }
    }

    fn step(&self) -> Step {
        match self {
            Self::Daily => Step::Days(1),
            Self::Weekly => Step::Days(7),
            Self::Monthly => Step::Months(1),
            Self::ThreeMonths => Step::Months(3),
            Self::SixMonths => Step::Months(6),
            Self::OneYear => Step::Months(12),
        }
    }

    /// Move `date` forward by `steps` recurrence intervals.
    ///
    /// Returns `None` only when the result leaves chrono's supported range.
    pub fn advance(&self, date: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self.step() {
            Step::Days(days) => date.checked_add_days(Days::new(days * u64::from(steps))),
            Step::Months(months) => {
                date.checked_add_months(Months::new(months.checked_mul(steps)?))
            }
        }
    }

    /// Number of whole steps needed to move `anchor` strictly past `today`.
    ///
    /// Returns 0 when `anchor` is already in the future.
    pub fn steps_past(&self, anchor: NaiveDate, today: NaiveDate) -> u32 {
        if anchor > today {
            return 0;
        }

        let mut steps = match self.step() {
            Step::Days(days) => {
                let elapsed = (today - anchor).num_days().unsigned_abs();
                // Jumps directly to the first step after `today`.
                return u32::try_from(elapsed / days + 1).unwrap_or(u32::MAX);
            }
            Step::Months(months) => {
                let elapsed = (today.year() - anchor.year()) * 12
                    + today.month() as i32
                    - anchor.month() as i32;
                u32::try_from(elapsed.max(0)).unwrap_or(0) / months
            }
        };

        // Month clamping can leave the estimate one step short.
        while self.advance(anchor, steps).is_some_and(|d| d <= today) {
            steps += 1;
        }
        steps
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
