//! # tally-engine — Attendance Engine Facade
//!
//! Single entry point over the attendance pipeline: policy loading, event
//! ingestion, occurrence review, expiration sweeps, summaries, and
//! alerting.
//!
//! ```text
//! AttendanceEvent ─▶ ingest ─▶ Ledger ─▶ summaries ─▶ alerts
//!                              ▲
//!            approve / excuse / dispute / sweep
//! ```
//!
//! Most consumers only need this crate; the domain types of the component
//! crates are re-exported here.

pub mod engine;
pub mod roster;

pub use engine::AttendanceEngine;
pub use roster::Roster;

pub use tally_alerts::{Alert, AlertCategory, AlertFilter, AlertSeverity};
pub use tally_compliance::{
    DepartmentAttendanceSummary, DisciplineStatus, EmployeeAttendanceSummary, UpcomingExpiration,
};
pub use tally_core::{
    AlertId, DepartmentId, EmployeeId, OccurrenceId, OccurrenceType, SupervisorId, TallyError,
    Timestamp,
};
pub use tally_ledger::{
    AttendanceEvent, AttendanceStatus, Occurrence, ReviewEvidence, ReviewStatus, SweepReport,
};
pub use tally_policy::PolicyConfiguration;
