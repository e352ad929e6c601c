//! # Employee Attendance Summary
//!
//! Per-employee rollup of the points ledger: active total, discipline
//! tier, historical counts, calendar-bucketed point sums, and the next
//! expiration on the horizon.
//!
//! ## Design
//!
//! Summaries are derived state. They are recomputed from occurrence
//! snapshots on every read and never stored or independently mutated, so
//! they cannot drift from the ledger. An occurrence with an unusable point
//! value is skipped and flagged rather than poisoning the whole summary.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tally_core::{month_start, quarter_start, year_start, EmployeeId, OccurrenceId, OccurrenceType};
use tally_ledger::Occurrence;
use tally_policy::PolicyConfiguration;

use crate::status::{evaluate, DisciplineStatus};

/// The soonest future roll-off among an employee's active occurrences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingExpiration {
    /// The occurrence that will roll off.
    pub occurrence_id: OccurrenceId,
    /// When it stops counting.
    pub expires_on: NaiveDate,
    /// The points that will come off the active total.
    pub points: f64,
}

/// Point-in-time rollup of one employee's attendance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeAttendanceSummary {
    /// The summarized employee.
    pub employee_id: EmployeeId,
    /// The date the summary was computed against.
    pub as_of: NaiveDate,
    /// Sum of points on pending or approved occurrences that have not
    /// reached their expiration date.
    pub active_points: f64,
    /// Discipline tier for the active total.
    pub status: DisciplineStatus,
    /// Historical occurrence counts per type, every review status
    /// included.
    pub counts_by_type: BTreeMap<OccurrenceType, usize>,
    /// Active points on occurrences dated in the calendar month of
    /// `as_of`.
    pub points_this_month: f64,
    /// Active points on occurrences dated in the calendar quarter of
    /// `as_of`.
    pub points_this_quarter: f64,
    /// Active points on occurrences dated in the calendar year of
    /// `as_of`.
    pub points_this_year: f64,
    /// The next scheduled roll-off, if any occurrence is still active.
    pub next_expiration: Option<UpcomingExpiration>,
    /// Occurrences skipped because their point value was unusable.
    pub skipped: Vec<OccurrenceId>,
}

impl EmployeeAttendanceSummary {
    /// Reduce an employee's occurrence history to a summary as of a date.
    pub fn compute(
        employee_id: EmployeeId,
        occurrences: &[Occurrence],
        policy: &PolicyConfiguration,
        as_of: NaiveDate,
    ) -> Self {
        let month_from = month_start(as_of);
        let quarter_from = quarter_start(as_of);
        let year_from = year_start(as_of);

        let mut counts_by_type: BTreeMap<OccurrenceType, usize> = BTreeMap::new();
        let mut active_points = 0.0;
        let mut points_this_month = 0.0;
        let mut points_this_quarter = 0.0;
        let mut points_this_year = 0.0;
        let mut next_expiration: Option<UpcomingExpiration> = None;
        let mut skipped = Vec::new();

        for occurrence in occurrences {
            if !occurrence.points.is_finite() {
                tracing::warn!(
                    occurrence = %occurrence.id,
                    employee = %employee_id,
                    "skipping occurrence with unusable point value"
                );
                skipped.push(occurrence.id.clone());
                continue;
            }

            *counts_by_type.entry(occurrence.occurrence_type).or_insert(0) += 1;

            if !occurrence.is_active(as_of) {
                continue;
            }
            active_points += occurrence.points;

            let dated = occurrence.occurred_on;
            if dated <= as_of {
                if dated >= month_from {
                    points_this_month += occurrence.points;
                }
                if dated >= quarter_from {
                    points_this_quarter += occurrence.points;
                }
                if dated >= year_from {
                    points_this_year += occurrence.points;
                }
            }

            let sooner = next_expiration
                .as_ref()
                .map_or(true, |current| occurrence.expires_on < current.expires_on);
            if sooner {
                next_expiration = Some(UpcomingExpiration {
                    occurrence_id: occurrence.id.clone(),
                    expires_on: occurrence.expires_on,
                    points: occurrence.points,
                });
            }
        }

        let status = evaluate(policy, active_points);
        Self {
            employee_id,
            as_of,
            active_points,
            status,
            counts_by_type,
            points_this_month,
            points_this_quarter,
            points_this_year,
            next_expiration,
            skipped,
        }
    }
}
