//! # Attendance Events — Raw Input from the Time & Attendance System
//!
//! Defines [`AttendanceEvent`], the per-shift record handed to the engine
//! by the time-and-attendance collaborator. Events are immutable once
//! ingested: the engine classifies them into occurrences but never edits
//! them, and punch correction belongs to the source system.
//!
//! The flags (`late`, `early_departure`, `no_call_no_show`) are asserted
//! upstream by the source system's own rules; the engine trusts them and
//! only derives `minutes_late` from the punch pair for reporting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tally_core::{EmployeeId, SupervisorId, Timestamp};

/// How the source system recorded the shift as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Employee worked the shift.
    Present,
    /// Employee did not work the shift.
    Absent,
    /// Employee worked a partial shift by arrangement.
    HalfDay,
    /// Employee was on approved leave.
    OnLeave,
}

impl AttendanceStatus {
    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::HalfDay => "half_day",
            Self::OnLeave => "on_leave",
        }
    }

    /// Return all attendance status variants.
    pub fn all() -> &'static [AttendanceStatus] {
        &[Self::Present, Self::Absent, Self::HalfDay, Self::OnLeave]
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single shift's attendance record as reported by the source system.
///
/// Events are the only input to the classifier. Build with
/// [`AttendanceEvent::new`] plus the `with_*` builders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceEvent {
    /// Source-system event identifier.
    pub event_id: Uuid,
    /// The employee this shift belongs to.
    pub employee_id: EmployeeId,
    /// The scheduled workday.
    pub shift_date: NaiveDate,
    /// Scheduled shift start.
    pub scheduled_clock_in: Option<Timestamp>,
    /// Scheduled shift end.
    pub scheduled_clock_out: Option<Timestamp>,
    /// Actual punch in, if the employee punched.
    pub actual_clock_in: Option<Timestamp>,
    /// Actual punch out, if the employee punched.
    pub actual_clock_out: Option<Timestamp>,
    /// Source-system late flag.
    pub late: bool,
    /// Source-system early-departure flag.
    pub early_departure: bool,
    /// Source-system no-call/no-show flag.
    pub no_call_no_show: bool,
    /// Shift-level status.
    pub status: AttendanceStatus,
    /// Free-text reason or notes from the source system.
    pub notes: Option<String>,
    /// Supervisor who approved the deviation, if any.
    pub approved_by: Option<SupervisorId>,
    /// When the deviation was approved, if it was.
    pub approved_at: Option<Timestamp>,
    /// Whether the deviation falls under a pre-approved exception
    /// (FMLA, jury duty, bereavement, and the like).
    pub approved_exception: bool,
}

impl AttendanceEvent {
    /// Create a new attendance event for a shift.
    pub fn new(employee_id: EmployeeId, shift_date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            employee_id,
            shift_date,
            scheduled_clock_in: None,
            scheduled_clock_out: None,
            actual_clock_in: None,
            actual_clock_out: None,
            late: false,
            early_departure: false,
            no_call_no_show: false,
            status,
            notes: None,
            approved_by: None,
            approved_at: None,
            approved_exception: false,
        }
    }

    /// Builder: set the scheduled shift window.
    pub fn with_schedule(mut self, clock_in: Timestamp, clock_out: Timestamp) -> Self {
        self.scheduled_clock_in = Some(clock_in);
        self.scheduled_clock_out = Some(clock_out);
        self
    }

    /// Builder: set the actual punch in.
    pub fn with_clock_in(mut self, at: Timestamp) -> Self {
        self.actual_clock_in = Some(at);
        self
    }

    /// Builder: set the actual punch out.
    pub fn with_clock_out(mut self, at: Timestamp) -> Self {
        self.actual_clock_out = Some(at);
        self
    }

    /// Builder: assert the source system's late flag.
    pub fn with_late_flag(mut self) -> Self {
        self.late = true;
        self
    }

    /// Builder: assert the source system's early-departure flag.
    pub fn with_early_departure_flag(mut self) -> Self {
        self.early_departure = true;
        self
    }

    /// Builder: assert the source system's no-call/no-show flag.
    pub fn with_no_call_no_show_flag(mut self) -> Self {
        self.no_call_no_show = true;
        self
    }

    /// Builder: attach free-text notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder: record a supervisor approval of the deviation.
    pub fn with_approval(mut self, approved_by: SupervisorId, approved_at: Timestamp) -> Self {
        self.approved_by = Some(approved_by);
        self.approved_at = Some(approved_at);
        self
    }

    /// Builder: mark the deviation as a pre-approved exception.
    pub fn with_approved_exception(mut self) -> Self {
        self.approved_exception = true;
        self
    }

    /// Whether this event carries any point-bearing signal.
    ///
    /// Fully compliant shifts (no flags, not absent) produce no occurrence
    /// and are dropped before classification.
    pub fn is_point_bearing(&self) -> bool {
        self.late
            || self.early_departure
            || self.no_call_no_show
            || self.status == AttendanceStatus::Absent
    }

    /// Minutes the employee punched in after the scheduled start.
    ///
    /// Derived from the scheduled/actual punch pair; `None` when either
    /// punch is missing or the employee was on time.
    pub fn minutes_late(&self) -> Option<i64> {
        let scheduled = self.scheduled_clock_in?;
        let actual = self.actual_clock_in?;
        let minutes = actual
            .as_datetime()
            .signed_duration_since(*scheduled.as_datetime())
            .num_minutes();
        (minutes > 0).then_some(minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    // -- AttendanceStatus --

    #[test]
    fn status_serde_roundtrip() {
        for s in AttendanceStatus::all() {
            let json = serde_json::to_string(s).unwrap();
            let parsed: AttendanceStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(*s, parsed);
        }
    }

    #[test]
    fn status_display_matches_as_str() {
        assert_eq!(AttendanceStatus::Present.to_string(), "present");
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "half_day");
        assert_eq!(AttendanceStatus::OnLeave.to_string(), "on_leave");
    }

    // -- Builders --

    #[test]
    fn builder_sets_all_fields() {
        let employee = EmployeeId::new();
        let supervisor = SupervisorId::new();
        let event = AttendanceEvent::new(employee.clone(), d(2026, 3, 2), AttendanceStatus::Present)
            .with_schedule(ts("2026-03-02T09:00:00Z"), ts("2026-03-02T17:00:00Z"))
            .with_clock_in(ts("2026-03-02T09:25:00Z"))
            .with_clock_out(ts("2026-03-02T17:02:00Z"))
            .with_late_flag()
            .with_notes("train delay")
            .with_approval(supervisor.clone(), ts("2026-03-02T10:00:00Z"));

        assert_eq!(event.employee_id, employee);
        assert_eq!(event.shift_date, d(2026, 3, 2));
        assert!(event.late);
        assert!(!event.early_departure);
        assert_eq!(event.notes.as_deref(), Some("train delay"));
        assert_eq!(event.approved_by, Some(supervisor));
        assert!(event.approved_at.is_some());
        assert!(!event.approved_exception);
    }

    // -- is_point_bearing --

    #[test]
    fn clean_present_shift_is_not_point_bearing() {
        let event =
            AttendanceEvent::new(EmployeeId::new(), d(2026, 3, 2), AttendanceStatus::Present);
        assert!(!event.is_point_bearing());
    }

    #[test]
    fn on_leave_shift_is_not_point_bearing() {
        let event =
            AttendanceEvent::new(EmployeeId::new(), d(2026, 3, 2), AttendanceStatus::OnLeave);
        assert!(!event.is_point_bearing());
    }

    #[test]
    fn each_signal_is_point_bearing() {
        let base = || AttendanceEvent::new(EmployeeId::new(), d(2026, 3, 2), AttendanceStatus::Present);
        assert!(base().with_late_flag().is_point_bearing());
        assert!(base().with_early_departure_flag().is_point_bearing());
        assert!(base().with_no_call_no_show_flag().is_point_bearing());

        let absent =
            AttendanceEvent::new(EmployeeId::new(), d(2026, 3, 2), AttendanceStatus::Absent);
        assert!(absent.is_point_bearing());
    }

    // -- minutes_late --

    #[test]
    fn minutes_late_derived_from_punch_pair() {
        let event =
            AttendanceEvent::new(EmployeeId::new(), d(2026, 3, 2), AttendanceStatus::Present)
                .with_schedule(ts("2026-03-02T09:00:00Z"), ts("2026-03-02T17:00:00Z"))
                .with_clock_in(ts("2026-03-02T09:25:00Z"))
                .with_late_flag();
        assert_eq!(event.minutes_late(), Some(25));
    }

    #[test]
    fn minutes_late_none_when_on_time() {
        let event =
            AttendanceEvent::new(EmployeeId::new(), d(2026, 3, 2), AttendanceStatus::Present)
                .with_schedule(ts("2026-03-02T09:00:00Z"), ts("2026-03-02T17:00:00Z"))
                .with_clock_in(ts("2026-03-02T08:58:00Z"));
        assert_eq!(event.minutes_late(), None);
    }

    #[test]
    fn minutes_late_none_without_punches() {
        let event =
            AttendanceEvent::new(EmployeeId::new(), d(2026, 3, 2), AttendanceStatus::Absent);
        assert_eq!(event.minutes_late(), None);
    }

    #[test]
    fn serde_roundtrip() {
        let event =
            AttendanceEvent::new(EmployeeId::new(), d(2026, 3, 2), AttendanceStatus::Present)
                .with_late_flag()
                .with_notes("bus strike");
        let json = serde_json::to_string(&event).unwrap();
        let parsed: AttendanceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.event_id, event.event_id);
        assert_eq!(parsed.employee_id, event.employee_id);
        assert!(parsed.late);
        assert_eq!(parsed.notes.as_deref(), Some("bus strike"));
    }
}
