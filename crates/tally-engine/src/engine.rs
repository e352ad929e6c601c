//! # Attendance Engine
//!
//! The facade the surrounding application talks to. Wires the policy,
//! points ledger, summary reducers, roster, and alert generator into one
//! handle and exposes the query and mutation surface.
//!
//! ## Design
//!
//! The engine is cheap to clone and safe to share across request
//! handlers: every component is either immutable (the validated policy)
//! or internally synchronized. Queries reduce ledger snapshots on demand;
//! nothing derived is ever cached or stored.

use chrono::NaiveDate;

use tally_alerts::{Alert, AlertFilter, AlertGenerator};
use tally_compliance::{DepartmentAttendanceSummary, EmployeeAttendanceSummary};
use tally_core::{AlertId, DepartmentId, EmployeeId, OccurrenceId, OccurrenceType, TallyError};
use tally_ledger::{AttendanceEvent, Ledger, Occurrence, ReviewEvidence, SweepReport};
use tally_policy::PolicyConfiguration;

use crate::roster::Roster;

/// One handle over the whole attendance pipeline.
#[derive(Debug, Clone)]
pub struct AttendanceEngine {
    policy: PolicyConfiguration,
    ledger: Ledger,
    roster: Roster,
    alerts: AlertGenerator,
}

impl AttendanceEngine {
    /// Build an engine from a policy, rejecting invalid configurations.
    pub fn new(policy: PolicyConfiguration) -> Result<Self, TallyError> {
        policy.validate()?;
        Ok(Self {
            ledger: Ledger::new(policy.clone()),
            roster: Roster::new(),
            alerts: AlertGenerator::new(policy.clone()),
            policy,
        })
    }

    /// Build an engine from a policy document in JSON form.
    pub fn from_policy_json(json: &str) -> Result<Self, TallyError> {
        Self::new(PolicyConfiguration::from_json_str(json)?)
    }

    /// The validated policy this engine runs under.
    pub fn policy(&self) -> &PolicyConfiguration {
        &self.policy
    }

    // -- Ingestion ------------------------------------------------------------

    /// Classify and record one attendance event.
    ///
    /// Fully compliant events produce no occurrence and return `None`.
    pub fn ingest_event(&self, event: &AttendanceEvent) -> Option<Occurrence> {
        self.ledger.record_event(event)
    }

    /// Classify and record a batch of attendance events, returning the
    /// occurrences that were created.
    pub fn ingest_batch(&self, events: &[AttendanceEvent]) -> Vec<Occurrence> {
        let recorded: Vec<Occurrence> = events
            .iter()
            .filter_map(|event| self.ledger.record_event(event))
            .collect();
        tracing::info!(
            events = events.len(),
            recorded = recorded.len(),
            "ingested attendance batch"
        );
        recorded
    }

    /// Record a supervisor-entered occurrence with no source event.
    pub fn record_occurrence(
        &self,
        employee_id: EmployeeId,
        occurrence_type: OccurrenceType,
        occurred_on: NaiveDate,
        notes: Option<String>,
    ) -> Occurrence {
        self.ledger
            .record_occurrence(employee_id, occurrence_type, occurred_on, notes)
    }

    // -- Review actions -------------------------------------------------------

    /// Approve an occurrence at the version the caller last read.
    pub fn approve(
        &self,
        id: &OccurrenceId,
        expected_version: u64,
        evidence: ReviewEvidence,
    ) -> Result<Occurrence, TallyError> {
        self.ledger.approve(id, expected_version, evidence)
    }

    /// Excuse an occurrence at the version the caller last read.
    pub fn excuse(
        &self,
        id: &OccurrenceId,
        expected_version: u64,
        evidence: ReviewEvidence,
    ) -> Result<Occurrence, TallyError> {
        self.ledger.excuse(id, expected_version, evidence)
    }

    /// Dispute an occurrence at the version the caller last read.
    pub fn dispute(
        &self,
        id: &OccurrenceId,
        expected_version: u64,
        evidence: ReviewEvidence,
    ) -> Result<Occurrence, TallyError> {
        self.ledger.dispute(id, expected_version, evidence)
    }

    /// Expire every countable occurrence whose window has elapsed.
    pub fn sweep_expirations(&self, as_of: NaiveDate) -> SweepReport {
        self.ledger.sweep_expirations(as_of)
    }

    // -- Roster ---------------------------------------------------------------

    /// Assign an employee to a department, returning the previous
    /// assignment on a move.
    pub fn assign_employee(
        &self,
        employee_id: EmployeeId,
        department_id: DepartmentId,
    ) -> Option<DepartmentId> {
        self.roster.assign(employee_id, department_id)
    }

    /// The roster backing department rollups.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    // -- Queries --------------------------------------------------------------

    /// One employee's full occurrence history in recording order.
    ///
    /// An employee is known if they are on the roster or have at least
    /// one recorded occurrence; anyone else is `NotFound`.
    pub fn get_ledger(&self, employee_id: &EmployeeId) -> Result<Vec<Occurrence>, TallyError> {
        let occurrences = self.ledger.occurrences_for(employee_id);
        if occurrences.is_empty() && !self.roster.is_assigned(employee_id) {
            return Err(TallyError::not_found("employee", employee_id));
        }
        Ok(occurrences)
    }

    /// Fetch a single occurrence by id.
    pub fn get_occurrence(&self, id: &OccurrenceId) -> Result<Occurrence, TallyError> {
        self.ledger
            .get(id)
            .ok_or_else(|| TallyError::not_found("occurrence", id))
    }

    /// Summarize one employee's standing as of a date.
    pub fn employee_summary(
        &self,
        employee_id: &EmployeeId,
        as_of: NaiveDate,
    ) -> Result<EmployeeAttendanceSummary, TallyError> {
        let occurrences = self.get_ledger(employee_id)?;
        Ok(EmployeeAttendanceSummary::compute(
            employee_id.clone(),
            &occurrences,
            &self.policy,
            as_of,
        ))
    }

    /// Summarize one department's standing as of a date.
    ///
    /// A department is known through its roster assignments; one with no
    /// members is `NotFound`.
    pub fn department_summary(
        &self,
        department_id: &DepartmentId,
        as_of: NaiveDate,
    ) -> Result<DepartmentAttendanceSummary, TallyError> {
        let member_ids = self.roster.members(department_id);
        if member_ids.is_empty() {
            return Err(TallyError::not_found("department", department_id));
        }

        let members: Vec<(EmployeeId, Vec<Occurrence>)> = member_ids
            .into_iter()
            .map(|employee_id| {
                let occurrences = self.ledger.occurrences_for(&employee_id);
                (employee_id, occurrences)
            })
            .collect();
        Ok(DepartmentAttendanceSummary::compute(
            department_id.clone(),
            &members,
            &self.policy,
            as_of,
        ))
    }

    // -- Alerts ---------------------------------------------------------------

    /// Scan every employee with ledger history and raise any new alerts.
    pub fn scan_alerts(&self, as_of: NaiveDate) -> Vec<Alert> {
        let mut created = Vec::new();
        for employee_id in self.ledger.employees() {
            let occurrences = self.ledger.occurrences_for(&employee_id);
            created.extend(self.alerts.scan_employee(&employee_id, &occurrences, as_of));
        }
        tracing::info!(raised = created.len(), as_of = %as_of, "alert scan complete");
        created
    }

    /// List alerts matching a filter, newest first.
    pub fn list_alerts(&self, filter: &AlertFilter) -> Vec<Alert> {
        self.alerts.list(filter)
    }

    /// Mark an alert as read.
    pub fn mark_alert_read(&self, id: &AlertId) -> Result<Alert, TallyError> {
        self.alerts.mark_read(id)
    }

    /// Dismiss an alert for good.
    pub fn dismiss_alert(&self, id: &AlertId) -> Result<Alert, TallyError> {
        self.alerts.dismiss(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_compliance::DisciplineStatus;
    use tally_ledger::AttendanceStatus;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn engine() -> AttendanceEngine {
        AttendanceEngine::new(PolicyConfiguration::standard()).unwrap()
    }

    #[test]
    fn invalid_policy_is_rejected_at_construction() {
        let mut policy = PolicyConfiguration::standard();
        policy.termination_threshold = policy.warning_threshold;
        assert!(matches!(
            AttendanceEngine::new(policy).unwrap_err(),
            TallyError::InvalidPolicy { .. }
        ));
    }

    #[test]
    fn unknown_employee_queries_are_not_found() {
        let engine = engine();
        let stranger = EmployeeId::new();
        assert!(matches!(
            engine.get_ledger(&stranger).unwrap_err(),
            TallyError::NotFound { .. }
        ));
        assert!(matches!(
            engine.employee_summary(&stranger, d(2026, 5, 1)).unwrap_err(),
            TallyError::NotFound { .. }
        ));
    }

    #[test]
    fn rostered_employee_with_clean_record_summarizes_empty() {
        let engine = engine();
        let employee = EmployeeId::new();
        engine.assign_employee(employee.clone(), DepartmentId::new());

        assert!(engine.get_ledger(&employee).unwrap().is_empty());
        let summary = engine.employee_summary(&employee, d(2026, 5, 1)).unwrap();
        assert_eq!(summary.active_points, 0.0);
        assert_eq!(summary.status, DisciplineStatus::Good);
    }

    #[test]
    fn unknown_department_summary_is_not_found() {
        let engine = engine();
        assert!(matches!(
            engine
                .department_summary(&DepartmentId::new(), d(2026, 5, 1))
                .unwrap_err(),
            TallyError::NotFound { .. }
        ));
    }

    #[test]
    fn ingest_batch_skips_compliant_events() {
        let engine = engine();
        let employee = EmployeeId::new();
        let events = vec![
            AttendanceEvent::new(employee.clone(), d(2026, 5, 4), AttendanceStatus::Present),
            AttendanceEvent::new(employee.clone(), d(2026, 5, 5), AttendanceStatus::Present)
                .with_late_flag(),
            AttendanceEvent::new(employee.clone(), d(2026, 5, 6), AttendanceStatus::Absent),
        ];

        let recorded = engine.ingest_batch(&events);
        assert_eq!(recorded.len(), 2);
        assert_eq!(engine.get_ledger(&employee).unwrap().len(), 2);
    }

    #[test]
    fn get_occurrence_round_trips() {
        let engine = engine();
        let recorded = engine.record_occurrence(
            EmployeeId::new(),
            OccurrenceType::Tardy,
            d(2026, 5, 4),
            None,
        );
        let fetched = engine.get_occurrence(&recorded.id).unwrap();
        assert_eq!(fetched.id, recorded.id);
        assert!(matches!(
            engine.get_occurrence(&OccurrenceId::new()).unwrap_err(),
            TallyError::NotFound { .. }
        ));
    }
}
