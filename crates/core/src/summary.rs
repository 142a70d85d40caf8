//! Dashboard summary buckets over stored maintenance schedules.
//!
//! Unlike projected occurrences, stored schedules carry a real status and an
//! optional completion instant. The four buckets are independent filters, so
//! one record can be counted in more than one of them.

use chrono::Duration;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Schedule status constants
// ---------------------------------------------------------------------------

pub const SCHEDULE_SCHEDULED: &str = "Scheduled";
pub const SCHEDULE_IN_PROGRESS: &str = "In Progress";
pub const SCHEDULE_COMPLETED: &str = "Completed";
pub const SCHEDULE_OVERDUE: &str = "Overdue";

/// All valid stored schedule statuses.
pub const VALID_SCHEDULE_STATUSES: &[&str] = &[
    SCHEDULE_SCHEDULED,
    SCHEDULE_IN_PROGRESS,
    SCHEDULE_COMPLETED,
    SCHEDULE_OVERDUE,
];

/// Validate a schedule status string.
pub fn validate_schedule_status(status: &str) -> Result<(), CoreError> {
    if VALID_SCHEDULE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown schedule status: '{status}'. Valid statuses: {}",
            VALID_SCHEDULE_STATUSES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// Look-back / look-ahead window for the summary panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SummaryWindow {
    #[default]
    Days30,
    Days90,
}

impl SummaryWindow {
    pub fn days(&self) -> i64 {
        match self {
            Self::Days30 => 30,
            Self::Days90 => 90,
        }
    }

    /// Parse a window length in days. Only 30 and 90 are offered.
    pub fn from_days(days: i64) -> Result<Self, CoreError> {
        match days {
            30 => Ok(Self::Days30),
            90 => Ok(Self::Days90),
            other => Err(CoreError::Validation(format!(
                "Unsupported summary window: {other} days. Use 30 or 90"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

/// The fields of a stored schedule the buckets look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRecord {
    pub id: DbId,
    pub instrument_id: DbId,
    pub maintenance_type: String,
    pub status: String,
    pub due_date: Timestamp,
    pub completed_date: Option<Timestamp>,
}

/// Records grouped into the four summary buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryBuckets<'a> {
    pub overdue: Vec<&'a ScheduleRecord>,
    pub upcoming: Vec<&'a ScheduleRecord>,
    pub partial: Vec<&'a ScheduleRecord>,
    pub completed: Vec<&'a ScheduleRecord>,
}

/// Classify `records` relative to `now`.
///
/// - overdue: due before `now` and not completed
/// - upcoming: due within `[now, now + window]`
/// - partial: status is `In Progress`
/// - completed: completed within `[now - window, now]`
pub fn summarize(
    records: &[ScheduleRecord],
    now: Timestamp,
    window: SummaryWindow,
) -> SummaryBuckets<'_> {
    let span = Duration::days(window.days());
    let range_end = now + span;
    let range_start = now - span;

    let mut buckets = SummaryBuckets::default();
    for record in records {
        if record.due_date < now && record.status != SCHEDULE_COMPLETED {
            buckets.overdue.push(record);
        }
        if record.due_date >= now && record.due_date <= range_end {
            buckets.upcoming.push(record);
        }
        if record.status == SCHEDULE_IN_PROGRESS {
            buckets.partial.push(record);
        }
        if record.status == SCHEDULE_COMPLETED {
            if let Some(done) = record.completed_date {
                if done >= range_start && done <= now {
                    buckets.completed.push(record);
                }
            }
        }
    }
    buckets
}

// ---------------------------------------------------------------------------
// List previews
// ---------------------------------------------------------------------------

/// Items shown per bucket before collapsing into "+N more".
pub const SUMMARY_PREVIEW_LIMIT: usize = 5;

/// First few items of a bucket plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketPreview<T> {
    pub total: usize,
    pub items: Vec<T>,
    pub remaining: usize,
}

pub fn preview<T: Clone>(items: &[T], limit: usize) -> BucketPreview<T> {
    let shown = items.len().min(limit);
    BucketPreview {
        total: items.len(),
        items: items[..shown].to_vec(),
        remaining: items.len() - shown,
    }
}

/// Whole days from `now` until `due`, truncated toward zero.
pub fn days_out(due: Timestamp, now: Timestamp) -> i64 {
    (due - now).num_days()
}

/// Short badge text for a day count: `"5d"` or `"3d overdue"`.
pub fn due_chip(days: i64) -> String {
    if days < 0 {
        format!("{}d overdue", days.unsigned_abs())
    } else {
        format!("{days}d")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    fn record(
        id: DbId,
        status: &str,
        due: Timestamp,
        completed: Option<Timestamp>,
    ) -> ScheduleRecord {
        ScheduleRecord {
            id,
            instrument_id: 1,
            maintenance_type: "Calibration".to_string(),
            status: status.to_string(),
            due_date: due,
            completed_date: completed,
        }
    }

    fn ids(items: &[&ScheduleRecord]) -> Vec<DbId> {
        items.iter().map(|r| r.id).collect()
    }

    #[test]
    fn yesterday_scheduled_is_overdue() {
        let now = at(2025, 1, 10);
        let records = [record(1, SCHEDULE_SCHEDULED, at(2025, 1, 9), None)];
        let buckets = summarize(&records, now, SummaryWindow::Days30);
        assert_eq!(ids(&buckets.overdue), vec![1]);
        assert!(buckets.upcoming.is_empty());
    }

    #[test]
    fn completed_is_never_overdue() {
        let now = at(2025, 1, 10);
        let records = [record(1, SCHEDULE_COMPLETED, at(2025, 1, 9), None)];
        let buckets = summarize(&records, now, SummaryWindow::Days30);
        assert!(buckets.overdue.is_empty());
        assert!(buckets.completed.is_empty(), "no completion date means not recent");
    }

    #[test]
    fn upcoming_respects_window_bounds() {
        let now = at(2025, 1, 1);
        let records = [
            record(1, SCHEDULE_SCHEDULED, now, None),
            record(2, SCHEDULE_SCHEDULED, now + Duration::days(30), None),
            record(3, SCHEDULE_SCHEDULED, now + Duration::days(31), None),
            record(4, SCHEDULE_SCHEDULED, now + Duration::days(90), None),
        ];

        let month = summarize(&records, now, SummaryWindow::Days30);
        assert_eq!(ids(&month.upcoming), vec![1, 2]);

        let quarter = summarize(&records, now, SummaryWindow::Days90);
        assert_eq!(ids(&quarter.upcoming), vec![1, 2, 3, 4]);
    }

    #[test]
    fn in_progress_is_partial_and_may_also_be_overdue() {
        let now = at(2025, 1, 10);
        let records = [record(1, SCHEDULE_IN_PROGRESS, at(2025, 1, 2), None)];
        let buckets = summarize(&records, now, SummaryWindow::Days30);
        assert_eq!(ids(&buckets.partial), vec![1]);
        assert_eq!(ids(&buckets.overdue), vec![1]);
    }

    #[test]
    fn recent_completion_window() {
        let now = at(2025, 3, 1);
        let records = [
            record(1, SCHEDULE_COMPLETED, at(2025, 2, 1), Some(at(2025, 2, 20))),
            record(2, SCHEDULE_COMPLETED, at(2024, 11, 1), Some(at(2024, 12, 15))),
            record(3, SCHEDULE_SCHEDULED, at(2025, 2, 1), Some(at(2025, 2, 20))),
        ];

        let month = summarize(&records, now, SummaryWindow::Days30);
        assert_eq!(ids(&month.completed), vec![1]);

        let quarter = summarize(&records, now, SummaryWindow::Days90);
        assert_eq!(ids(&quarter.completed), vec![1, 2]);
    }

    #[test]
    fn completion_exactly_at_window_start_counts() {
        let now = at(2025, 3, 1);
        let start = now - Duration::days(30);
        let records = [
            record(1, SCHEDULE_COMPLETED, at(2025, 1, 20), Some(start)),
            record(2, SCHEDULE_COMPLETED, at(2025, 1, 20), Some(start - Duration::seconds(1))),
            record(3, SCHEDULE_COMPLETED, at(2025, 2, 25), Some(now)),
        ];

        let month = summarize(&records, now, SummaryWindow::Days30);
        assert_eq!(ids(&month.completed), vec![1, 3]);
    }

    #[test]
    fn window_parsing() {
        assert_eq!(SummaryWindow::from_days(30).unwrap(), SummaryWindow::Days30);
        assert_eq!(SummaryWindow::from_days(90).unwrap(), SummaryWindow::Days90);
        assert!(SummaryWindow::from_days(60).is_err());
    }

    #[test]
    fn preview_truncates_at_limit() {
        let items: Vec<u32> = (0..8).collect();
        let p = preview(&items, SUMMARY_PREVIEW_LIMIT);
        assert_eq!(p.total, 8);
        assert_eq!(p.items, vec![0, 1, 2, 3, 4]);
        assert_eq!(p.remaining, 3);

        let short = preview(&items[..2], SUMMARY_PREVIEW_LIMIT);
        assert_eq!(short.remaining, 0);
        assert_eq!(short.items.len(), 2);
    }

    #[test]
    fn chips() {
        assert_eq!(due_chip(5), "5d");
        assert_eq!(due_chip(0), "0d");
        assert_eq!(due_chip(-3), "3d overdue");
    }

    #[test]
    fn days_out_truncates_partial_days() {
        let now = at(2025, 1, 1);
        assert_eq!(days_out(now + Duration::hours(47), now), 1);
        assert_eq!(days_out(now - Duration::hours(25), now), -1);
    }

    #[test]
    fn status_validation() {
        assert!(validate_schedule_status("In Progress").is_ok());
        assert!(validate_schedule_status("Done").is_err());
    }
}
