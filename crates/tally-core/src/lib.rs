//! # tally-core — Foundational Types for the Attendance Engine
//!
//! This crate is the bedrock of the Tally attendance stack. It defines the
//! type-system primitives shared by every other crate in the workspace:
//! identifier newtypes, the occurrence taxonomy, UTC temporal primitives,
//! and the error hierarchy. Every other crate depends on `tally-core`; it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `EmployeeId`,
//!    `SupervisorId`, `DepartmentId`, `OccurrenceId`, `AlertId` — you cannot
//!    pass an employee where an occurrence is expected. No bare strings or
//!    bare UUIDs for identifiers.
//!
//! 2. **Single `OccurrenceType` enum.** One definition, five variants,
//!    exhaustive `match` everywhere. Adding an occurrence type forces every
//!    consumer — classifier, policy, summaries — to handle it at compile
//!    time.
//!
//! 3. **UTC-only timestamps, calendar dates for business days.** `Timestamp`
//!    enforces UTC at seconds precision for audit records; occurrence and
//!    expiration dates are `chrono::NaiveDate` because attendance policy is
//!    written in calendar days, not instants.
//!
//! 4. **One error hierarchy.** `TallyError` carries the four error kinds the
//!    engine can surface; callers branch on the kind, never on message text.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tally-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod error;
pub mod identity;
pub mod occurrence;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::TallyError;
pub use identity::{AlertId, DepartmentId, EmployeeId, OccurrenceId, SupervisorId};
pub use occurrence::OccurrenceType;
pub use temporal::{days_until, expiration_date, month_start, quarter_start, year_start, Timestamp};
