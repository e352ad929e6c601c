//! # tally-compliance — Status Evaluation and Summaries
//!
//! The read side of the attendance engine: reduces occurrence snapshots
//! into discipline tiers, per-employee summaries, and department rollups.
//!
//! Everything here is a pure function of (occurrences, policy, date).
//! Nothing is cached and nothing mutates the ledger, so the outputs are
//! safe to recompute on every screen refresh or poll and can never drift
//! from the records they were derived from.

pub mod department;
pub mod status;
pub mod summary;

pub use department::DepartmentAttendanceSummary;
pub use status::{evaluate, DisciplineStatus};
pub use summary::{EmployeeAttendanceSummary, UpcomingExpiration};
