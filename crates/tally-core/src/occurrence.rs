//! # Occurrence Taxonomy — Single Source of Truth
//!
//! Defines the `OccurrenceType` enum with the five point-bearing attendance
//! infractions. This is the ONE definition used across the engine. Every
//! `match` on `OccurrenceType` must be exhaustive — adding a type forces the
//! classifier, the policy table, and every summary to handle it at compile
//! time.
//!
//! Classification priority lives in the classifier, not here; the enum's
//! declaration order is the reporting order used by summaries.

use serde::{Deserialize, Serialize};

/// The five point-bearing attendance infraction types.
///
/// Every recorded occurrence carries exactly one of these. The policy
/// assigns each type its point value; the classifier decides which type a
/// raw attendance event maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceType {
    /// Arrived after the scheduled clock-in.
    Tardy,
    /// Absent for the full scheduled day.
    Absent,
    /// Left before the scheduled clock-out.
    EarlyOut,
    /// Absent with no notification — the most serious infraction.
    NoCallNoShow,
    /// An attendance deviation that fits no more specific type.
    UnexcusedAbsence,
}

impl OccurrenceType {
    /// Returns all occurrence types in reporting order.
    pub fn all() -> &'static [OccurrenceType] {
        &[
            Self::Tardy,
            Self::Absent,
            Self::EarlyOut,
            Self::NoCallNoShow,
            Self::UnexcusedAbsence,
        ]
    }

    /// Returns the snake_case string identifier for this type.
    ///
    /// This must match the serde serialization format; alert deduplication
    /// keys and log fields are built from it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tardy => "tardy",
            Self::Absent => "absent",
            Self::EarlyOut => "early_out",
            Self::NoCallNoShow => "no_call_no_show",
            Self::UnexcusedAbsence => "unexcused_absence",
        }
    }
}

impl std::fmt::Display for OccurrenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
