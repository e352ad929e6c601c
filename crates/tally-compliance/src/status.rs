//! # Discipline Status Evaluator
//!
//! Reduces an employee's active point total to a progressive-discipline
//! tier using the policy thresholds. Pure and side-effect free, safe to
//! call on every read.
//!
//! Thresholds are inclusive lower bounds and the policy loader guarantees
//! they are strictly increasing, so the evaluator can walk them from the
//! top down and stop at the first one the total meets.

use serde::{Deserialize, Serialize};

use tally_policy::PolicyConfiguration;

/// Progressive-discipline standing derived from active points.
///
/// Variants are ordered from best to worst, so the derived `Ord` agrees
/// with [`DisciplineStatus::rank`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DisciplineStatus {
    /// Below the warning threshold.
    Good,
    /// At or above the warning threshold.
    Warning,
    /// At or above the probation threshold.
    Probation,
    /// At or above the final-warning threshold.
    FinalWarning,
    /// At or above the termination threshold.
    Termination,
}

impl DisciplineStatus {
    /// Numeric rank of this tier, from 0 (good) to 4 (termination).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Good => 0,
            Self::Warning => 1,
            Self::Probation => 2,
            Self::FinalWarning => 3,
            Self::Termination => 4,
        }
    }

    /// Whether this tier counts toward a department's at-risk headcount.
    pub fn is_at_risk(&self) -> bool {
        !matches!(self, Self::Good)
    }

    /// Return the string representation of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Probation => "probation",
            Self::FinalWarning => "final_warning",
            Self::Termination => "termination",
        }
    }

    /// Return all tiers in ascending order.
    pub fn all() -> &'static [DisciplineStatus] {
        &[
            Self::Good,
            Self::Warning,
            Self::Probation,
            Self::FinalWarning,
            Self::Termination,
        ]
    }
}

impl std::fmt::Display for DisciplineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate an active point total against the policy thresholds.
///
/// The highest threshold the total meets or exceeds wins; a total below
/// the warning threshold is good standing.
pub fn evaluate(policy: &PolicyConfiguration, active_points: f64) -> DisciplineStatus {
    if active_points >= policy.termination_threshold {
        DisciplineStatus::Termination
    } else if active_points >= policy.final_warning_threshold {
        DisciplineStatus::FinalWarning
    } else if active_points >= policy.probation_threshold {
        DisciplineStatus::Probation
    } else if active_points >= policy.warning_threshold {
        DisciplineStatus::Warning
    } else {
        DisciplineStatus::Good
    }
}
