//! # Policy Configuration — Validated Attendance Rules
//!
//! The policy document arrives from the policy store as JSON under
//! camelCase keys. It is deserialized into [`PolicyConfiguration`] — a
//! closed struct, not a string-keyed bag — and validated as a whole before
//! the engine will use it.
//!
//! ## Options
//!
//! | Key | Constraint |
//! |-----|------------|
//! | `pointsPerTardy` | non-negative number |
//! | `pointsPerAbsent` | non-negative number |
//! | `pointsPerEarlyOut` | non-negative number |
//! | `pointsPerNoCallNoShow` | non-negative number |
//! | `pointsPerUnexcusedAbsence` | non-negative number |
//! | `warningThreshold` | positive, < probationThreshold |
//! | `probationThreshold` | positive, < finalWarningThreshold |
//! | `finalWarningThreshold` | positive, < terminationThreshold |
//! | `terminationThreshold` | positive |
//! | `expirationWindowDays` | positive integer, defaults to 365 |
//! | `pendingReviewGraceDays` | positive integer |
//! | `expirationWarningDays` | positive integer |
//!
//! ## Determinism
//!
//! Point values are read from the policy once, at classification time, and
//! stored on the occurrence. Editing a policy never rewrites points already
//! on the books.

use serde::{Deserialize, Serialize};

use tally_core::{OccurrenceType, TallyError};

/// Number of days in the default rolling expiration window.
const DEFAULT_EXPIRATION_WINDOW_DAYS: u32 = 365;

fn default_expiration_window_days() -> u32 {
    DEFAULT_EXPIRATION_WINDOW_DAYS
}

/// The complete attendance policy for an organization.
///
/// Deserialized from the policy store's camelCase JSON contract. Must pass
/// [`PolicyConfiguration::validate()`] before use; [`PolicyConfiguration::from_json_str()`]
/// performs both steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConfiguration {
    /// Points assigned to a tardy occurrence.
    pub points_per_tardy: f64,
    /// Points assigned to a full-day absence.
    pub points_per_absent: f64,
    /// Points assigned to an early departure.
    pub points_per_early_out: f64,
    /// Points assigned to a no-call/no-show.
    pub points_per_no_call_no_show: f64,
    /// Points assigned to an unexcused absence.
    pub points_per_unexcused_absence: f64,

    /// Active-point total at which the warning tier begins (inclusive).
    pub warning_threshold: f64,
    /// Active-point total at which the probation tier begins (inclusive).
    pub probation_threshold: f64,
    /// Active-point total at which the final-warning tier begins (inclusive).
    pub final_warning_threshold: f64,
    /// Active-point total at which the termination tier begins (inclusive).
    pub termination_threshold: f64,

    /// Rolling window, in calendar days, after which an occurrence expires.
    #[serde(default = "default_expiration_window_days")]
    pub expiration_window_days: u32,
    /// Days an occurrence may sit pending before a review alert is raised.
    pub pending_review_grace_days: u32,
    /// Days ahead of an expiration date at which an informational alert
    /// is raised.
    pub expiration_warning_days: u32,
}

impl PolicyConfiguration {
    /// The stock policy: 1 point per tardy or early departure, 2 per
    /// absence, 3 per unexcused absence, 4 per no-call/no-show, with
    /// thresholds at 5/10/15/20 points and a 365-day rolling window.
    pub fn standard() -> Self {
        Self {
            points_per_tardy: 1.0,
            points_per_absent: 2.0,
            points_per_early_out: 1.0,
            points_per_no_call_no_show: 4.0,
            points_per_unexcused_absence: 3.0,
            warning_threshold: 5.0,
            probation_threshold: 10.0,
            final_warning_threshold: 15.0,
            termination_threshold: 20.0,
            expiration_window_days: DEFAULT_EXPIRATION_WINDOW_DAYS,
            pending_review_grace_days: 5,
            expiration_warning_days: 7,
        }
    }

    /// Parse and validate a policy document from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidPolicy`] if the document is malformed,
    /// a required key is missing, or any option violates its constraint.
    pub fn from_json_str(json: &str) -> Result<Self, TallyError> {
        let policy: Self = serde_json::from_str(json).map_err(|e| TallyError::InvalidPolicy {
            reason: format!("malformed policy document: {e}"),
        })?;
        policy.validate()?;
        Ok(policy)
    }

    /// Validate every option against its constraint.
    ///
    /// All-or-nothing: the first violation is returned and the policy is
    /// rejected. Nothing is clamped or defaulted here — defaults are
    /// applied at deserialization, before validation.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidPolicy`] naming the violated option.
    pub fn validate(&self) -> Result<(), TallyError> {
        let point_values = [
            ("pointsPerTardy", self.points_per_tardy),
            ("pointsPerAbsent", self.points_per_absent),
            ("pointsPerEarlyOut", self.points_per_early_out),
            ("pointsPerNoCallNoShow", self.points_per_no_call_no_show),
            (
                "pointsPerUnexcusedAbsence",
                self.points_per_unexcused_absence,
            ),
        ];
        for (key, value) in point_values {
            if !value.is_finite() || value < 0.0 {
                return Err(TallyError::InvalidPolicy {
                    reason: format!("{key} must be a non-negative number, got {value}"),
                });
            }
        }

        let thresholds = [
            ("warningThreshold", self.warning_threshold),
            ("probationThreshold", self.probation_threshold),
            ("finalWarningThreshold", self.final_warning_threshold),
            ("terminationThreshold", self.termination_threshold),
        ];
        for (key, value) in thresholds {
            if !value.is_finite() || value <= 0.0 {
                return Err(TallyError::InvalidPolicy {
                    reason: format!("{key} must be a positive number, got {value}"),
                });
            }
        }
        for window in thresholds.windows(2) {
            let (lower_key, lower) = window[0];
            let (upper_key, upper) = window[1];
            if lower >= upper {
                return Err(TallyError::InvalidPolicy {
                    reason: format!(
                        "thresholds must be strictly increasing: {lower_key} ({lower}) >= {upper_key} ({upper})"
                    ),
                });
            }
        }

        let day_counts = [
            ("expirationWindowDays", self.expiration_window_days),
            ("pendingReviewGraceDays", self.pending_review_grace_days),
            ("expirationWarningDays", self.expiration_warning_days),
        ];
        for (key, value) in day_counts {
            if value == 0 {
                return Err(TallyError::InvalidPolicy {
                    reason: format!("{key} must be a positive integer"),
                });
            }
        }

        Ok(())
    }

    /// The point value this policy assigns to an occurrence type.
    pub fn points_for(&self, occurrence_type: OccurrenceType) -> f64 {
        match occurrence_type {
            OccurrenceType::Tardy => self.points_per_tardy,
            OccurrenceType::Absent => self.points_per_absent,
            OccurrenceType::EarlyOut => self.points_per_early_out,
            OccurrenceType::NoCallNoShow => self.points_per_no_call_no_show,
            OccurrenceType::UnexcusedAbsence => self.points_per_unexcused_absence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_policy_json() -> &'static str {
        r#"{
            "pointsPerTardy": 1.0,
            "pointsPerAbsent": 2.0,
            "pointsPerEarlyOut": 0.5,
            "pointsPerNoCallNoShow": 4.0,
            "pointsPerUnexcusedAbsence": 3.0,
            "warningThreshold": 5,
            "probationThreshold": 10,
            "finalWarningThreshold": 15,
            "terminationThreshold": 20,
            "expirationWindowDays": 365,
            "pendingReviewGraceDays": 5,
            "expirationWarningDays": 30
        }"#
    }

    // -- Validation --

    #[test]
    fn standard_policy_is_valid() {
        assert!(PolicyConfiguration::standard().validate().is_ok());
    }

    #[test]
    fn negative_point_value_rejected() {
        let mut policy = PolicyConfiguration::standard();
        policy.points_per_tardy = -1.0;
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("pointsPerTardy"));
    }

    #[test]
    fn nan_point_value_rejected() {
        let mut policy = PolicyConfiguration::standard();
        policy.points_per_absent = f64::NAN;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn zero_point_value_allowed() {
        // An organization may choose not to penalize a type at all.
        let mut policy = PolicyConfiguration::standard();
        policy.points_per_early_out = 0.0;
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn equal_thresholds_rejected() {
        let mut policy = PolicyConfiguration::standard();
        policy.probation_threshold = policy.warning_threshold;
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn decreasing_thresholds_rejected() {
        let mut policy = PolicyConfiguration::standard();
        policy.final_warning_threshold = 2.0;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn zero_threshold_rejected() {
        let mut policy = PolicyConfiguration::standard();
        policy.warning_threshold = 0.0;
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("warningThreshold"));
    }

    #[test]
    fn zero_expiration_window_rejected() {
        let mut policy = PolicyConfiguration::standard();
        policy.expiration_window_days = 0;
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("expirationWindowDays"));
    }

    #[test]
    fn zero_grace_days_rejected() {
        let mut policy = PolicyConfiguration::standard();
        policy.pending_review_grace_days = 0;
        assert!(policy.validate().is_err());
    }

    // -- JSON contract --

    #[test]
    fn from_json_str_full_document() {
        let policy = PolicyConfiguration::from_json_str(full_policy_json()).unwrap();
        assert_eq!(policy.points_per_early_out, 0.5);
        assert_eq!(policy.termination_threshold, 20.0);
        assert_eq!(policy.expiration_window_days, 365);
    }

    #[test]
    fn expiration_window_defaults_to_365() {
        let json = r#"{
            "pointsPerTardy": 1.0,
            "pointsPerAbsent": 2.0,
            "pointsPerEarlyOut": 1.0,
            "pointsPerNoCallNoShow": 4.0,
            "pointsPerUnexcusedAbsence": 3.0,
            "warningThreshold": 5,
            "probationThreshold": 10,
            "finalWarningThreshold": 15,
            "terminationThreshold": 20,
            "pendingReviewGraceDays": 5,
            "expirationWarningDays": 30
        }"#;
        let policy = PolicyConfiguration::from_json_str(json).unwrap();
        assert_eq!(policy.expiration_window_days, 365);
    }

    #[test]
    fn missing_required_key_is_invalid_policy() {
        let err = PolicyConfiguration::from_json_str(r#"{"pointsPerTardy": 1.0}"#).unwrap_err();
        assert!(matches!(err, TallyError::InvalidPolicy { .. }));
    }

    #[test]
    fn malformed_json_is_invalid_policy() {
        let err = PolicyConfiguration::from_json_str("not json at all").unwrap_err();
        assert!(matches!(err, TallyError::InvalidPolicy { .. }));
    }

    #[test]
    fn invalid_value_rejected_at_load() {
        let json = full_policy_json().replace("\"pointsPerTardy\": 1.0", "\"pointsPerTardy\": -3");
        let err = PolicyConfiguration::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("pointsPerTardy"));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_string(&PolicyConfiguration::standard()).unwrap();
        assert!(json.contains("\"pointsPerNoCallNoShow\""));
        assert!(json.contains("\"finalWarningThreshold\""));
        assert!(!json.contains("points_per_tardy"));
    }

    #[test]
    fn serde_roundtrip() {
        let policy = PolicyConfiguration::standard();
        let json = serde_json::to_string(&policy).unwrap();
        let parsed = PolicyConfiguration::from_json_str(&json).unwrap();
        assert_eq!(policy, parsed);
    }

    // -- points_for --

    #[test]
    fn points_for_covers_every_type() {
        let policy = PolicyConfiguration::standard();
        assert_eq!(policy.points_for(OccurrenceType::Tardy), 1.0);
        assert_eq!(policy.points_for(OccurrenceType::Absent), 2.0);
        assert_eq!(policy.points_for(OccurrenceType::EarlyOut), 1.0);
        assert_eq!(policy.points_for(OccurrenceType::NoCallNoShow), 4.0);
        assert_eq!(policy.points_for(OccurrenceType::UnexcusedAbsence), 3.0);
    }
}
