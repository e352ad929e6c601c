//! # Points Ledger
//!
//! The per-employee history of point-bearing occurrences and the controlled
//! mutations on it. The ledger owns classification of incoming events,
//! point assignment from the policy in force, supervisor review actions,
//! and the rolling expiration sweep.
//!
//! ## Design
//!
//! The ledger is append-only: occurrences are never deleted, they change
//! review status. Point values and expiration dates are fixed at recording
//! time; editing the policy later affects new occurrences only. All review
//! mutations are version-checked compare-and-swap operations, so concurrent
//! reviewers cannot silently overwrite each other.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tally_core::{expiration_date, EmployeeId, OccurrenceId, OccurrenceType, TallyError};
use tally_policy::PolicyConfiguration;

use crate::classify::{classify, initial_review_status};
use crate::event::AttendanceEvent;
use crate::occurrence::{Occurrence, ReviewEvidence, ReviewStatus};
use crate::store::OccurrenceStore;

// -- Sweep Report -------------------------------------------------------------

/// Outcome of one expiration sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// The date the sweep evaluated expirations against.
    pub as_of: NaiveDate,
    /// Total occurrences examined.
    pub examined: usize,
    /// Occurrences moved to expired by this sweep.
    pub expired: usize,
}

// -- Ledger -------------------------------------------------------------------

/// The points ledger: occurrence records plus the policy used to write
/// new ones.
#[derive(Debug, Clone)]
pub struct Ledger {
    store: OccurrenceStore,
    policy: PolicyConfiguration,
}

impl Ledger {
    /// Create an empty ledger governed by the given policy.
    ///
    /// The policy is taken as already validated; see
    /// [`PolicyConfiguration::validate`].
    pub fn new(policy: PolicyConfiguration) -> Self {
        Self {
            store: OccurrenceStore::new(),
            policy,
        }
    }

    /// The policy governing new recordings.
    pub fn policy(&self) -> &PolicyConfiguration {
        &self.policy
    }

    // -- Recording ------------------------------------------------------------

    /// Classify an attendance event and record the resulting occurrence.
    ///
    /// Returns `None` for fully compliant events, which produce no
    /// occurrence. The point value, expiration date, and initial review
    /// status are all fixed here, from the policy currently in force.
    pub fn record_event(&self, event: &AttendanceEvent) -> Option<Occurrence> {
        if !event.is_point_bearing() {
            tracing::debug!(
                employee = %event.employee_id,
                date = %event.shift_date,
                "event carries no point-bearing signal, nothing recorded"
            );
            return None;
        }

        let occurrence_type = classify(event);
        let status = initial_review_status(event);
        let mut occurrence = Occurrence::new(
            event.employee_id.clone(),
            occurrence_type,
            self.policy.points_for(occurrence_type),
            event.shift_date,
            expiration_date(event.shift_date, self.policy.expiration_window_days),
            status,
        );
        if occurrence_type == OccurrenceType::Tardy {
            if let Some(minutes) = event.minutes_late() {
                occurrence = occurrence.with_minutes_late(minutes);
            }
        }
        if let Some(notes) = &event.notes {
            occurrence = occurrence.with_notes(notes.clone());
        }
        if status != ReviewStatus::Pending {
            if let Some(supervisor) = &event.approved_by {
                occurrence = occurrence.with_reviewer(supervisor.clone());
            }
        }

        tracing::info!(
            occurrence = %occurrence.id,
            employee = %occurrence.employee_id,
            occurrence_type = %occurrence.occurrence_type,
            points = occurrence.points,
            status = %occurrence.status,
            expires_on = %occurrence.expires_on,
            "recorded attendance occurrence"
        );
        self.store.insert(occurrence.clone());
        Some(occurrence)
    }

    /// Record a supervisor-entered occurrence with no source event.
    ///
    /// Points and expiration come from the policy in force, and the
    /// occurrence starts pending review like any other.
    pub fn record_occurrence(
        &self,
        employee_id: EmployeeId,
        occurrence_type: OccurrenceType,
        occurred_on: NaiveDate,
        notes: Option<String>,
    ) -> Occurrence {
        let mut occurrence = Occurrence::new(
            employee_id,
            occurrence_type,
            self.policy.points_for(occurrence_type),
            occurred_on,
            expiration_date(occurred_on, self.policy.expiration_window_days),
            ReviewStatus::Pending,
        );
        if let Some(notes) = notes {
            occurrence = occurrence.with_notes(notes);
        }

        tracing::info!(
            occurrence = %occurrence.id,
            employee = %occurrence.employee_id,
            occurrence_type = %occurrence.occurrence_type,
            points = occurrence.points,
            "recorded manual occurrence"
        );
        self.store.insert(occurrence.clone());
        occurrence
    }

    // -- Review actions -------------------------------------------------------

    /// Approve an occurrence, returning the updated record.
    ///
    /// `expected_version` is the version the caller last read; a mismatch
    /// means another reviewer got there first and yields `Conflict`.
    pub fn approve(
        &self,
        id: &OccurrenceId,
        expected_version: u64,
        evidence: ReviewEvidence,
    ) -> Result<Occurrence, TallyError> {
        let updated = self.store.apply(id, expected_version, |occ| {
            occ.approve(evidence)?;
            Ok(occ.clone())
        })?;
        tracing::info!(occurrence = %updated.id, version = updated.version, "occurrence approved");
        Ok(updated)
    }

    /// Excuse an occurrence, removing its points from the active total.
    pub fn excuse(
        &self,
        id: &OccurrenceId,
        expected_version: u64,
        evidence: ReviewEvidence,
    ) -> Result<Occurrence, TallyError> {
        let updated = self.store.apply(id, expected_version, |occ| {
            occ.excuse(evidence)?;
            Ok(occ.clone())
        })?;
        tracing::info!(occurrence = %updated.id, version = updated.version, "occurrence excused");
        Ok(updated)
    }

    /// Mark an occurrence as disputed by the employee.
    pub fn dispute(
        &self,
        id: &OccurrenceId,
        expected_version: u64,
        evidence: ReviewEvidence,
    ) -> Result<Occurrence, TallyError> {
        let updated = self.store.apply(id, expected_version, |occ| {
            occ.dispute(evidence)?;
            Ok(occ.clone())
        })?;
        tracing::info!(occurrence = %updated.id, version = updated.version, "occurrence disputed");
        Ok(updated)
    }

    // -- Expiration -----------------------------------------------------------

    /// Move every countable occurrence whose expiration date has been
    /// reached to expired.
    ///
    /// The whole sweep runs under one write lock, and each occurrence's
    /// status is re-checked at application time, so a sweep racing a
    /// review action settles on whichever write landed first. Sweeping
    /// twice with the same date is a no-op the second time.
    pub fn sweep_expirations(&self, as_of: NaiveDate) -> SweepReport {
        let mut examined = 0;
        let mut expired = 0;
        self.store.for_each_mut(|occ| {
            examined += 1;
            let due = occ.status.is_countable() && occ.expires_on <= as_of;
            if due && occ.expire().is_ok() {
                expired += 1;
            }
        });

        let report = SweepReport {
            as_of,
            examined,
            expired,
        };
        tracing::info!(
            as_of = %report.as_of,
            examined = report.examined,
            expired = report.expired,
            "expiration sweep complete"
        );
        report
    }

    // -- Queries --------------------------------------------------------------

    /// Sum of point values counting against an employee as of a date.
    ///
    /// Only pending and approved occurrences whose expiration date is
    /// still ahead contribute; excused, disputed, and expired ones never
    /// do, and neither does anything past its expiration date, swept or
    /// not.
    pub fn active_points(&self, employee_id: &EmployeeId, as_of: NaiveDate) -> f64 {
        self.store
            .for_employee(employee_id)
            .iter()
            .filter(|occ| occ.is_active(as_of))
            .map(|occ| occ.points)
            .sum()
    }

    /// One employee's full occurrence history in recording order.
    pub fn occurrences_for(&self, employee_id: &EmployeeId) -> Vec<Occurrence> {
        self.store.for_employee(employee_id)
    }

    /// Fetch a single occurrence by id.
    pub fn get(&self, id: &OccurrenceId) -> Option<Occurrence> {
        self.store.get(id)
    }

    /// Every employee with at least one recorded occurrence, in stable
    /// order.
    pub fn employees(&self) -> Vec<EmployeeId> {
        self.store.employees()
    }

    /// Total number of occurrences on the ledger.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the ledger has no occurrences at all.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
