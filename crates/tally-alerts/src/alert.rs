//! # Alert Model
//!
//! Alert records raised by ledger and summary scans, plus the filter used
//! to query them. Alerts are identified for deduplication by
//! `(employee, category, subject)`, so repeated scans of an unchanged
//! ledger never pile up duplicates.

use serde::{Deserialize, Serialize};

use tally_core::{AlertId, DepartmentId, EmployeeId, Timestamp};

// ─── Severity ────────────────────────────────────────────────────────

/// How urgently an alert needs attention.
///
/// Variants are ordered, so the derived `Ord` can drive minimum-severity
/// filtering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Informational; no action required.
    Low,
    /// Worth a look during normal review.
    Medium,
    /// Needs prompt supervisor attention.
    High,
    /// Requires immediate action.
    Critical,
}

impl AlertSeverity {
    /// Return the string representation of this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Return all severities in ascending order.
    pub fn all() -> &'static [AlertSeverity] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Category ────────────────────────────────────────────────────────

/// What a scan found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    /// An employee's discipline tier went up.
    ThresholdCrossed,
    /// An occurrence has sat pending review past the grace period.
    PendingReview,
    /// An active occurrence rolls off within the warning window.
    ApproachingExpiration,
}

impl AlertCategory {
    /// Return the string representation of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThresholdCrossed => "threshold_crossed",
            Self::PendingReview => "pending_review",
            Self::ApproachingExpiration => "approaching_expiration",
        }
    }

    /// Return all alert categories.
    pub fn all() -> &'static [AlertCategory] {
        &[
            Self::ThresholdCrossed,
            Self::PendingReview,
            Self::ApproachingExpiration,
        ]
    }
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Alert ───────────────────────────────────────────────────────────

/// A single raised alert.
///
/// The read and dismissed flags are the only fields that change after
/// creation; everything else is fixed by the scan that raised it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert identifier.
    pub id: AlertId,
    /// What the scan found.
    pub category: AlertCategory,
    /// How urgent it is.
    pub severity: AlertSeverity,
    /// The employee the alert concerns, if any.
    pub employee_id: Option<EmployeeId>,
    /// The department the alert concerns, if any.
    pub department_id: Option<DepartmentId>,
    /// Distinguishes repeated findings in the same category for the same
    /// employee: the crossed tier name or the subject occurrence id.
    pub subject: String,
    /// Human-readable description of the finding.
    pub message: String,
    /// Whether a consumer has seen this alert.
    pub read: bool,
    /// Whether a consumer has dismissed this alert for good.
    pub dismissed: bool,
    /// When the alert was raised.
    pub created_at: Timestamp,
}

impl Alert {
    /// Create an unread, undismissed alert.
    pub fn new(
        category: AlertCategory,
        severity: AlertSeverity,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: AlertId::new(),
            category,
            severity,
            employee_id: None,
            department_id: None,
            subject: subject.into(),
            message: message.into(),
            read: false,
            dismissed: false,
            created_at: Timestamp::now(),
        }
    }

    /// Builder: attach the subject employee.
    pub fn with_employee(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    /// Builder: attach the subject department.
    pub fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// The key scans deduplicate on.
    pub fn dedup_key(&self) -> (Option<EmployeeId>, AlertCategory, String) {
        (self.employee_id.clone(), self.category, self.subject.clone())
    }
}

// ─── Filter ──────────────────────────────────────────────────────────

/// Criteria for listing alerts.
///
/// The default filter returns everything except dismissed alerts.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    /// Only alerts for this employee.
    pub employee_id: Option<EmployeeId>,
    /// Only alerts for this department.
    pub department_id: Option<DepartmentId>,
    /// Only alerts in this category.
    pub category: Option<AlertCategory>,
    /// Only alerts at or above this severity.
    pub min_severity: Option<AlertSeverity>,
    /// Only alerts nobody has read yet.
    pub unread_only: bool,
    /// Include dismissed alerts in the results.
    pub include_dismissed: bool,
}

impl AlertFilter {
    /// A filter matching every non-dismissed alert.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: restrict to one employee.
    pub fn with_employee(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    /// Builder: restrict to one department.
    pub fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Builder: restrict to one category.
    pub fn with_category(mut self, category: AlertCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Builder: require at least this severity.
    pub fn with_min_severity(mut self, severity: AlertSeverity) -> Self {
        self.min_severity = Some(severity);
        self
    }

    /// Builder: drop alerts that have already been read.
    pub fn unread(mut self) -> Self {
        self.unread_only = true;
        self
    }

    /// Builder: include dismissed alerts.
    pub fn with_dismissed(mut self) -> Self {
        self.include_dismissed = true;
        self
    }

    /// Whether an alert passes this filter.
    pub fn matches(&self, alert: &Alert) -> bool {
        if !self.include_dismissed && alert.dismissed {
            return false;
        }
        if self.unread_only && alert.read {
            return false;
        }
        if let Some(employee_id) = &self.employee_id {
            if alert.employee_id.as_ref() != Some(employee_id) {
                return false;
            }
        }
        if let Some(department_id) = &self.department_id {
            if alert.department_id.as_ref() != Some(department_id) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if alert.category != category {
                return false;
            }
        }
        if let Some(min) = self.min_severity {
            if alert.severity < min {
                return false;
            }
        }
        true
    }
}
