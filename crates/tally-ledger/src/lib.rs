//! # tally-ledger — Points Ledger for the Attendance Engine
//!
//! Turns raw attendance events into point-bearing occurrence records and
//! owns their review lifecycle from recording to expiration.
//!
//! ## Pipeline
//!
//! ```text
//! AttendanceEvent ──▶ classify ──▶ Occurrence ──▶ Ledger
//!                                                   │
//!                            approve / excuse / dispute / sweep
//! ```
//!
//! The [`Ledger`] is the write surface: it classifies incoming events,
//! fixes point values from the policy in force, applies version-checked
//! review actions, and runs the rolling expiration sweep. Everything
//! downstream (status evaluation, summaries, alerts) reads occurrence
//! snapshots and derives from them.

pub mod classify;
pub mod event;
pub mod ledger;
pub mod occurrence;
pub mod store;

pub use classify::{classify, initial_review_status};
pub use event::{AttendanceEvent, AttendanceStatus};
pub use ledger::{Ledger, SweepReport};
pub use occurrence::{Occurrence, OccurrenceTransitionRecord, ReviewEvidence, ReviewStatus};
pub use store::OccurrenceStore;
