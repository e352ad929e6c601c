//! # Department Attendance Summary
//!
//! Rolls the per-employee summaries of one department into headcounts,
//! rates, and a compliance score. Pure reducer over occurrence snapshots,
//! like the employee summary.
//!
//! One employee's unusable ledger entries never abort the department
//! rollup: the offending records are skipped inside that employee's
//! summary and the employee is flagged on the result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tally_core::{DepartmentId, EmployeeId, OccurrenceType};
use tally_ledger::{Occurrence, ReviewStatus};
use tally_policy::PolicyConfiguration;

use crate::summary::EmployeeAttendanceSummary;

/// Point-in-time rollup of one department's attendance standing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentAttendanceSummary {
    /// The summarized department.
    pub department_id: DepartmentId,
    /// The date the summary was computed against.
    pub as_of: NaiveDate,
    /// Employees assigned to the department.
    pub headcount: usize,
    /// Employees with at least one non-excused occurrence on record.
    pub employees_with_occurrences: usize,
    /// Mean active points across the whole headcount.
    pub average_active_points: f64,
    /// Employees whose discipline tier is anything but good.
    pub at_risk_count: usize,
    /// Percentage of employees with at least one non-excused tardy.
    pub tardy_rate: f64,
    /// Percentage of employees with at least one non-excused absence.
    pub absence_rate: f64,
    /// `100 − at-risk share`, clamped to `[0, 100]`.
    pub compliance_score: f64,
    /// Employees whose ledgers contained entries that had to be skipped.
    pub flagged_employees: Vec<EmployeeId>,
}

impl DepartmentAttendanceSummary {
    /// Reduce a department's member ledgers to a summary as of a date.
    ///
    /// `members` carries one entry per assigned employee, each with that
    /// employee's full occurrence history (possibly empty).
    pub fn compute(
        department_id: DepartmentId,
        members: &[(EmployeeId, Vec<Occurrence>)],
        policy: &PolicyConfiguration,
        as_of: NaiveDate,
    ) -> Self {
        let headcount = members.len();
        let mut employees_with_occurrences = 0;
        let mut total_active_points = 0.0;
        let mut at_risk_count = 0;
        let mut tardy_headcount = 0;
        let mut absence_headcount = 0;
        let mut flagged_employees = Vec::new();

        for (employee_id, occurrences) in members {
            let summary = EmployeeAttendanceSummary::compute(
                employee_id.clone(),
                occurrences,
                policy,
                as_of,
            );

            if occurrences.iter().any(counts_against_record) {
                employees_with_occurrences += 1;
            }
            if occurrences
                .iter()
                .any(|o| counts_against_record(o) && o.occurrence_type == OccurrenceType::Tardy)
            {
                tardy_headcount += 1;
            }
            if occurrences
                .iter()
                .any(|o| counts_against_record(o) && o.occurrence_type == OccurrenceType::Absent)
            {
                absence_headcount += 1;
            }

            total_active_points += summary.active_points;
            if summary.status.is_at_risk() {
                at_risk_count += 1;
            }
            if !summary.skipped.is_empty() {
                flagged_employees.push(employee_id.clone());
            }
        }

        if !flagged_employees.is_empty() {
            tracing::warn!(
                department = %department_id,
                flagged = flagged_employees.len(),
                "department summary skipped unusable ledger entries"
            );
        }

        let (average_active_points, tardy_rate, absence_rate, compliance_score) = if headcount == 0
        {
            // An empty department has nothing at risk.
            (0.0, 0.0, 0.0, 100.0)
        } else {
            let denom = headcount as f64;
            (
                total_active_points / denom,
                100.0 * tardy_headcount as f64 / denom,
                100.0 * absence_headcount as f64 / denom,
                (100.0 - (at_risk_count as f64 / denom) * 100.0).clamp(0.0, 100.0),
            )
        };

        Self {
            department_id,
            as_of,
            headcount,
            employees_with_occurrences,
            average_active_points,
            at_risk_count,
            tardy_rate,
            absence_rate,
            compliance_score,
            flagged_employees,
        }
    }
}

/// Whether an occurrence counts against the employee's record for
/// headcount and rate purposes. Excusal forgives the occurrence entirely,
/// expiration does not rewrite history, and records skipped for unusable
/// point values are treated as absent here too.
fn counts_against_record(occurrence: &Occurrence) -> bool {
    occurrence.points.is_finite() && occurrence.status != ReviewStatus::Excused
}
