//! # tally-alerts — Alerting over the Attendance Ledger
//!
//! Raises and manages alerts derived from ledger scans: discipline-tier
//! crossings, reviews sitting past their grace period, and active points
//! about to roll off.
//!
//! Alerts are plain records with read/dismissed flags; the
//! [`AlertGenerator`] owns them and is the only writer. Scans upsert by
//! dedup key, so they are safe to run on every poll.

pub mod alert;
pub mod generator;

pub use alert::{Alert, AlertCategory, AlertFilter, AlertSeverity};
pub use generator::AlertGenerator;
