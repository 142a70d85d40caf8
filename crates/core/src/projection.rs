//! Recurring maintenance schedule projection.
//!
//! Expands each active maintenance configuration into a bounded run of future
//! due dates, joins the owning instrument's identity onto every occurrence and
//! returns the whole set in chronological order.
//!
//! The projector is a pure function of its inputs. The reference day is always
//! supplied by the caller (see [`today_utc`]); nothing here reads the clock.
//! Configurations that cannot be projected are skipped and reported through
//! [`Projection::issues`] so the integrator can decide between logging them and
//! failing the request ([`Projection::into_strict`]).

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::frequency::Frequency;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The slice of an instrument row the projector needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionInstrument {
    pub id: DbId,
    /// Human-readable equipment code, used as the display name.
    pub eqp_id: String,
    pub instrument_type: String,
    pub location: String,
}

/// The slice of a maintenance configuration row the projector needs.
///
/// `frequency` is kept as the raw stored label so rows written before
/// validation existed still reach the projector and get reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionConfiguration {
    pub id: DbId,
    pub instrument_id: DbId,
    pub maintenance_type: String,
    pub frequency: String,
    pub schedule_date: NaiveDate,
    pub template_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Classification of a freshly projected occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectedStatus {
    Scheduled,
    Overdue,
}

/// One concrete occurrence generated from a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedEvent {
    /// `{configuration_id}-{YYYY-MM-DD}`, stable within one projection run.
    pub id: String,
    pub configuration_id: DbId,
    pub instrument_id: DbId,
    pub instrument_name: String,
    pub instrument_type: String,
    pub location: String,
    pub maintenance_type: String,
    pub frequency: Frequency,
    pub description: String,
    pub template_id: Option<DbId>,
    pub due_date: NaiveDate,
    /// Signed day count from the reference day; negative means overdue.
    pub days_left: i64,
    pub status: ProjectedStatus,
}

/// A configuration the projector had to skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionIssue {
    /// The configuration references an instrument that was not supplied.
    OrphanedConfiguration {
        configuration_id: DbId,
        instrument_id: DbId,
    },
    /// The stored frequency label is not one of the known recurrences.
    UnknownFrequency {
        configuration_id: DbId,
        frequency: String,
    },
}

/// Fail-fast form of a [`ProjectionIssue`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("Configuration {configuration_id} references missing instrument {instrument_id}")]
    OrphanedConfiguration {
        configuration_id: DbId,
        instrument_id: DbId,
    },

    #[error("Configuration {configuration_id} has unknown frequency '{frequency}'")]
    UnknownFrequency {
        configuration_id: DbId,
        frequency: String,
    },
}

impl From<ProjectionIssue> for ProjectionError {
    fn from(issue: ProjectionIssue) -> Self {
        match issue {
            ProjectionIssue::OrphanedConfiguration {
                configuration_id,
                instrument_id,
            } => Self::OrphanedConfiguration {
                configuration_id,
                instrument_id,
            },
            ProjectionIssue::UnknownFrequency {
                configuration_id,
                frequency,
            } => Self::UnknownFrequency {
                configuration_id,
                frequency,
            },
        }
    }
}

/// Result of one projection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// Every projected occurrence, ascending by due date.
    pub events: Vec<ProjectedEvent>,
    /// Configurations that were skipped, in input order.
    pub issues: Vec<ProjectionIssue>,
}

impl Projection {
    /// Return the events, or the first recorded issue as an error.
    pub fn into_strict(self) -> Result<Vec<ProjectedEvent>, ProjectionError> {
        match self.issues.into_iter().next() {
            Some(issue) => Err(issue.into()),
            None => Ok(self.events),
        }
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Normalize an instant to its UTC calendar day.
pub fn today_utc(now: Timestamp) -> NaiveDate {
    now.date_naive()
}

/// Project every configuration into its upcoming occurrences.
///
/// For each configuration: resolve the instrument, move the schedule date
/// strictly past `today` if it is not already in the future, then emit
/// `frequency.max_occurrences()` consecutive recurrences. Each occurrence is
/// one step after the previous one, so a date clamped at month end stays on
/// the clamped day (Jan 31, Feb 28, Mar 28).
pub fn project(
    configurations: &[ProjectionConfiguration],
    instruments: &[ProjectionInstrument],
    today: NaiveDate,
) -> Projection {
    let by_id: HashMap<DbId, &ProjectionInstrument> =
        instruments.iter().map(|i| (i.id, i)).collect();

    let mut projection = Projection::default();

    for config in configurations {
        let Some(instrument) = by_id.get(&config.instrument_id) else {
            projection.issues.push(ProjectionIssue::OrphanedConfiguration {
                configuration_id: config.id,
                instrument_id: config.instrument_id,
            });
            continue;
        };

        let Some(frequency) = Frequency::parse(&config.frequency) else {
            projection.issues.push(ProjectionIssue::UnknownFrequency {
                configuration_id: config.id,
                frequency: config.frequency.clone(),
            });
            continue;
        };

        let first = frequency.steps_past(config.schedule_date, today);
        let description = format!("{} - {}", config.maintenance_type, frequency);

        let occurrences = std::iter::successors(
            frequency.advance(config.schedule_date, first),
            |current| frequency.advance(*current, 1),
        )
        .take(frequency.max_occurrences());

        for due_date in occurrences {
            let days_left = (due_date - today).num_days();
            projection.events.push(ProjectedEvent {
                id: format!("{}-{}", config.id, due_date.format("%Y-%m-%d")),
                configuration_id: config.id,
                instrument_id: instrument.id,
                instrument_name: instrument.eqp_id.clone(),
                instrument_type: instrument.instrument_type.clone(),
                location: instrument.location.clone(),
                maintenance_type: config.maintenance_type.clone(),
                frequency,
                description: description.clone(),
                template_id: config.template_id,
                due_date,
                days_left,
                status: if days_left < 0 {
                    ProjectedStatus::Overdue
                } else {
                    ProjectedStatus::Scheduled
                },
            });
        }
    }

    // `sort_by_key` is stable, so same-day events keep configuration order.
    projection.events.sort_by_key(|e| e.due_date);
    projection
}

// ---------------------------------------------------------------------------
// Type badges
// ---------------------------------------------------------------------------

/// Occurrence count for one maintenance type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub maintenance_type: String,
    pub count: usize,
}

/// Count projected occurrences per maintenance type.
///
/// Sorted by count descending, then by type name. Blank types are grouped
/// under `Other`.
pub fn count_by_type(events: &[ProjectedEvent]) -> Vec<TypeCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for event in events {
        let key = match event.maintenance_type.trim() {
            "" => "Other",
            t => t,
        };
        *counts.entry(key).or_default() += 1;
    }

    let mut out: Vec<TypeCount> = counts
        .into_iter()
        .map(|(t, count)| TypeCount {
            maintenance_type: t.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.maintenance_type.cmp(&b.maintenance_type))
    });
    out
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instrument(id: DbId, eqp_id: &str) -> ProjectionInstrument {
        ProjectionInstrument {
            id,
            eqp_id: eqp_id.to_string(),
            instrument_type: "HPLC".to_string(),
            location: "Lab 2".to_string(),
        }
    }

    fn config(
        id: DbId,
        instrument_id: DbId,
        frequency: &str,
        schedule_date: NaiveDate,
    ) -> ProjectionConfiguration {
        ProjectionConfiguration {
            id,
            instrument_id,
            maintenance_type: "Preventive Maintenance".to_string(),
            frequency: frequency.to_string(),
            schedule_date,
            template_id: None,
        }
    }

    // -----------------------------------------------------------------------
    // Concrete scenarios
    // -----------------------------------------------------------------------

    #[test]
    fn monthly_from_past_anchor() {
        let today = day(2025, 1, 1);
        let result = project(
            &[config(7, 1, "Monthly", day(2024, 12, 15))],
            &[instrument(1, "EQP-001")],
            today,
        );

        assert!(result.issues.is_empty());
        assert_eq!(result.events.len(), 12);

        let dates: Vec<NaiveDate> = result.events.iter().map(|e| e.due_date).collect();
        let expected: Vec<NaiveDate> = (1..=12).map(|m| day(2025, m, 15)).collect();
        assert_eq!(dates, expected);

        let first = &result.events[0];
        assert_eq!(first.days_left, 14);
        assert_eq!(first.id, "7-2025-01-15");
        assert_eq!(first.instrument_name, "EQP-001");
        assert_eq!(first.instrument_type, "HPLC");
        assert_eq!(first.location, "Lab 2");
        assert_eq!(first.description, "Preventive Maintenance - Monthly");
        assert_eq!(first.status, ProjectedStatus::Scheduled);
    }

    #[test]
    fn month_end_anchor_stays_on_clamped_day() {
        let today = day(2025, 1, 1);
        let result = project(
            &[config(1, 1, "Monthly", day(2025, 1, 31))],
            &[instrument(1, "EQP-001")],
            today,
        );

        let dates: Vec<NaiveDate> = result.events.iter().take(4).map(|e| e.due_date).collect();
        assert_eq!(
            dates,
            vec![day(2025, 1, 31), day(2025, 2, 28), day(2025, 3, 28), day(2025, 4, 28)]
        );
    }

    #[test]
    fn each_occurrence_steps_from_the_previous_one() {
        let today = day(2025, 1, 1);
        let result = project(
            &[config(1, 1, "3 Months", day(2024, 11, 30))],
            &[instrument(1, "EQP-001")],
            today,
        );

        let dates: Vec<NaiveDate> = result.events.iter().take(3).map(|e| e.due_date).collect();
        // 30 Nov + 3 months = 28 Feb (clamped), then 28 May, 28 Aug.
        assert_eq!(dates, vec![day(2025, 2, 28), day(2025, 5, 28), day(2025, 8, 28)]);
    }

    #[test]
    fn anchor_equal_to_today_is_advanced() {
        let today = day(2025, 1, 1);
        let result = project(
            &[config(1, 1, "Weekly", today)],
            &[instrument(1, "EQP-001")],
            today,
        );

        assert_eq!(result.events[0].due_date, day(2025, 1, 8));
        assert_eq!(result.events[0].days_left, 7);
    }

    #[test]
    fn future_anchor_is_emitted_as_is() {
        let today = day(2025, 1, 1);
        let result = project(
            &[config(1, 1, "1 Year", day(2025, 6, 1))],
            &[instrument(1, "EQP-001")],
            today,
        );

        let dates: Vec<NaiveDate> = result.events.iter().map(|e| e.due_date).collect();
        assert_eq!(dates, vec![day(2025, 6, 1), day(2026, 6, 1), day(2027, 6, 1)]);
    }

    #[test]
    fn long_stale_anchor_still_projects_forward() {
        let today = day(2025, 1, 1);
        let result = project(
            &[config(1, 1, "3 Months", day(2019, 3, 10))],
            &[instrument(1, "EQP-001")],
            today,
        );

        assert_eq!(result.events.len(), 8);
        assert_eq!(result.events[0].due_date, day(2025, 3, 10));
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    #[test]
    fn occurrence_caps_per_frequency() {
        let today = day(2025, 1, 1);
        let instruments = [instrument(1, "EQP-001")];

        let daily = project(&[config(1, 1, "Daily", day(2024, 1, 1))], &instruments, today);
        assert_eq!(daily.events.len(), 30);

        let yearly = project(&[config(2, 1, "1 Year", day(2024, 1, 1))], &instruments, today);
        assert_eq!(yearly.events.len(), 3);
    }

    #[test]
    fn output_is_future_only_and_chronological() {
        let today = day(2025, 3, 14);
        let configs: Vec<ProjectionConfiguration> = crate::frequency::VALID_FREQUENCIES
            .iter()
            .enumerate()
            .map(|(i, f)| config(i as DbId + 1, 1, f, day(2024, 11, 30)))
            .collect();

        let result = project(&configs, &[instrument(1, "EQP-001")], today);

        assert_eq!(result.events.len(), 30 + 26 + 12 + 8 + 6 + 3);
        assert!(result.events.iter().all(|e| e.due_date > today && e.days_left > 0));
        assert!(result.events.iter().all(|e| e.status == ProjectedStatus::Scheduled));
        assert!(result
            .events
            .windows(2)
            .all(|w| w[0].due_date <= w[1].due_date));
    }

    #[test]
    fn projection_is_deterministic() {
        let today = day(2025, 1, 1);
        let configs = [
            config(1, 1, "Weekly", day(2024, 12, 1)),
            config(2, 2, "Monthly", day(2025, 2, 1)),
        ];
        let instruments = [instrument(1, "EQP-001"), instrument(2, "EQP-002")];

        assert_eq!(
            project(&configs, &instruments, today),
            project(&configs, &instruments, today)
        );
    }

    #[test]
    fn same_day_events_keep_configuration_order() {
        let today = day(2025, 1, 1);
        let configs = [
            config(9, 1, "Monthly", day(2025, 2, 1)),
            config(3, 1, "Monthly", day(2025, 2, 1)),
        ];
        let result = project(&configs, &[instrument(1, "EQP-001")], today);

        assert_eq!(result.events[0].configuration_id, 9);
        assert_eq!(result.events[1].configuration_id, 3);
    }

    // -----------------------------------------------------------------------
    // Skipped configurations
    // -----------------------------------------------------------------------

    #[test]
    fn orphaned_configuration_is_skipped_and_reported() {
        let today = day(2025, 1, 1);
        let result = project(
            &[config(4, 99, "Monthly", day(2025, 2, 1)), config(5, 1, "Monthly", day(2025, 2, 1))],
            &[instrument(1, "EQP-001")],
            today,
        );

        assert_eq!(result.events.len(), 12);
        assert!(result.events.iter().all(|e| e.configuration_id == 5));
        assert_eq!(
            result.issues,
            vec![ProjectionIssue::OrphanedConfiguration {
                configuration_id: 4,
                instrument_id: 99
            }]
        );
    }

    #[test]
    fn unknown_frequency_is_skipped_and_reported() {
        let today = day(2025, 1, 1);
        let result = project(
            &[config(4, 1, "Fortnightly", day(2025, 2, 1))],
            &[instrument(1, "EQP-001")],
            today,
        );

        assert!(result.events.is_empty());
        assert_matches!(
            result.issues.as_slice(),
            [ProjectionIssue::UnknownFrequency { configuration_id: 4, frequency }] if frequency == "Fortnightly"
        );
    }

    #[test]
    fn strict_mode_surfaces_first_issue() {
        let today = day(2025, 1, 1);
        let result = project(
            &[config(4, 99, "Monthly", day(2025, 2, 1))],
            &[instrument(1, "EQP-001")],
            today,
        );

        assert_matches!(
            result.into_strict(),
            Err(ProjectionError::OrphanedConfiguration { configuration_id: 4, instrument_id: 99 })
        );
    }

    #[test]
    fn strict_mode_passes_clean_projection() {
        let today = day(2025, 1, 1);
        let events = project(
            &[config(1, 1, "6 Months", day(2025, 2, 1))],
            &[instrument(1, "EQP-001")],
            today,
        )
        .into_strict()
        .expect("clean projection should pass strict mode");
        assert_eq!(events.len(), 6);
    }

    #[test]
    fn empty_inputs_produce_empty_projection() {
        let result = project(&[], &[], day(2025, 1, 1));
        assert_eq!(result, Projection::default());
    }

    #[test]
    fn today_utc_discards_time_of_day() {
        let ts = chrono::DateTime::parse_from_rfc3339("2025-01-01T23:59:59Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        assert_eq!(today_utc(ts), day(2025, 1, 1));
    }

    // -----------------------------------------------------------------------
    // Type counts
    // -----------------------------------------------------------------------

    #[test]
    fn counts_sorted_by_count_then_name() {
        let today = day(2025, 1, 1);
        let mut amc = config(2, 1, "1 Year", day(2025, 2, 1));
        amc.maintenance_type = "AMC".to_string();
        let mut calibration = config(3, 1, "1 Year", day(2025, 2, 1));
        calibration.maintenance_type = "Calibration".to_string();
        let pm = config(1, 1, "6 Months", day(2025, 2, 1));

        let result = project(&[amc, calibration, pm], &[instrument(1, "EQP-001")], today);
        let counts = count_by_type(&result.events);

        assert_eq!(
            counts,
            vec![
                TypeCount { maintenance_type: "Preventive Maintenance".to_string(), count: 6 },
                TypeCount { maintenance_type: "AMC".to_string(), count: 3 },
                TypeCount { maintenance_type: "Calibration".to_string(), count: 3 },
            ]
        );
    }
}
