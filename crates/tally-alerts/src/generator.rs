//! # Alert Generator
//!
//! Scans employee ledgers for threshold crossings, stale pending reviews,
//! and near-term expirations, and maintains the resulting alert set.
//!
//! ## Design
//!
//! The generator is a standalone service with its own store, decoupled
//! from any rendering lifecycle. Scans are idempotent: each finding is
//! upserted by its dedup key (employee, category, subject), so rescanning
//! an unchanged ledger raises nothing new, and a dismissed alert stays
//! dismissed even while its condition persists. Tier-crossing detection
//! keeps a last-observed-tier memory per employee; an employee never seen
//! before is compared against good standing, so the first scan surfaces
//! anyone already in trouble.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;

use tally_compliance::{evaluate, DisciplineStatus};
use tally_core::{days_until, AlertId, EmployeeId, TallyError};
use tally_ledger::{Occurrence, ReviewStatus};
use tally_policy::PolicyConfiguration;

use crate::alert::{Alert, AlertCategory, AlertFilter, AlertSeverity};

type DedupKey = (Option<EmployeeId>, AlertCategory, String);

#[derive(Debug, Default)]
struct Inner {
    /// Alerts in creation order.
    alerts: Vec<Alert>,
    /// Dedup key to alert id, covering read and dismissed alerts too.
    index: HashMap<DedupKey, AlertId>,
    /// Last discipline tier observed per employee.
    last_tier: HashMap<EmployeeId, DisciplineStatus>,
}

/// Scanning service that raises and stores alerts.
#[derive(Debug, Clone)]
pub struct AlertGenerator {
    policy: PolicyConfiguration,
    inner: Arc<RwLock<Inner>>,
}

impl AlertGenerator {
    /// Create a generator with no alerts and no tier memory.
    pub fn new(policy: PolicyConfiguration) -> Self {
        Self {
            policy,
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Run all three scans over one employee's occurrence history.
    ///
    /// Returns the alerts newly raised by this scan; findings that
    /// already have an alert (by dedup key) are left untouched. The scan
    /// runs under a single write lock, so concurrent scans of the same
    /// employee cannot double-raise.
    pub fn scan_employee(
        &self,
        employee_id: &EmployeeId,
        occurrences: &[Occurrence],
        as_of: NaiveDate,
    ) -> Vec<Alert> {
        let active_points: f64 = occurrences
            .iter()
            .filter(|o| o.points.is_finite() && o.is_active(as_of))
            .map(|o| o.points)
            .sum();
        let tier = evaluate(&self.policy, active_points);

        let mut created = Vec::new();
        let mut guard = self.inner.write();

        let previous = guard
            .last_tier
            .get(employee_id)
            .copied()
            .unwrap_or(DisciplineStatus::Good);
        if tier.rank() > previous.rank() {
            let alert = Alert::new(
                AlertCategory::ThresholdCrossed,
                severity_for_tier(tier),
                tier.as_str(),
                format!(
                    "discipline status escalated to {tier} at {active_points:.1} active points"
                ),
            )
            .with_employee(employee_id.clone());
            if let Some(alert) = upsert(&mut guard, alert) {
                created.push(alert);
            }
        }
        guard.last_tier.insert(employee_id.clone(), tier);

        for occurrence in occurrences {
            if occurrence.status == ReviewStatus::Pending {
                let pending_days = days_until(occurrence.occurred_on, as_of);
                if pending_days > i64::from(self.policy.pending_review_grace_days) {
                    let alert = Alert::new(
                        AlertCategory::PendingReview,
                        AlertSeverity::Medium,
                        occurrence.id.to_string(),
                        format!(
                            "{} occurrence from {} pending review for {} days",
                            occurrence.occurrence_type, occurrence.occurred_on, pending_days
                        ),
                    )
                    .with_employee(employee_id.clone());
                    if let Some(alert) = upsert(&mut guard, alert) {
                        created.push(alert);
                    }
                }
            }

            if occurrence.is_active(as_of) {
                let days_left = days_until(as_of, occurrence.expires_on);
                if days_left <= i64::from(self.policy.expiration_warning_days) {
                    let alert = Alert::new(
                        AlertCategory::ApproachingExpiration,
                        AlertSeverity::Low,
                        occurrence.id.to_string(),
                        format!(
                            "{:.1} points roll off on {}",
                            occurrence.points, occurrence.expires_on
                        ),
                    )
                    .with_employee(employee_id.clone());
                    if let Some(alert) = upsert(&mut guard, alert) {
                        created.push(alert);
                    }
                }
            }
        }

        created
    }

    /// List alerts matching a filter, newest first.
    pub fn list(&self, filter: &AlertFilter) -> Vec<Alert> {
        let guard = self.inner.read();
        let mut matched: Vec<Alert> = guard
            .alerts
            .iter()
            .filter(|alert| filter.matches(alert))
            .cloned()
            .collect();
        matched.reverse();
        matched
    }

    /// Mark an alert as read, returning the updated record.
    pub fn mark_read(&self, id: &AlertId) -> Result<Alert, TallyError> {
        self.update_flags(id, |alert| alert.read = true)
    }

    /// Dismiss an alert for good, returning the updated record.
    ///
    /// Dismissal hides the alert from default listings and survives later
    /// scans; the same finding is never re-raised.
    pub fn dismiss(&self, id: &AlertId) -> Result<Alert, TallyError> {
        self.update_flags(id, |alert| alert.dismissed = true)
    }

    fn update_flags(
        &self,
        id: &AlertId,
        f: impl FnOnce(&mut Alert),
    ) -> Result<Alert, TallyError> {
        let mut guard = self.inner.write();
        let alert = guard
            .alerts
            .iter_mut()
            .find(|alert| &alert.id == id)
            .ok_or_else(|| TallyError::not_found("alert", id))?;
        f(alert);
        Ok(alert.clone())
    }
}

/// Raise `alert` unless a finding with the same dedup key already exists.
fn upsert(inner: &mut Inner, alert: Alert) -> Option<Alert> {
    let key = alert.dedup_key();
    if inner.index.contains_key(&key) {
        return None;
    }
    tracing::info!(
        alert = %alert.id,
        category = %alert.category,
        severity = %alert.severity,
        "alert raised"
    );
    inner.index.insert(key, alert.id.clone());
    inner.alerts.push(alert.clone());
    Some(alert)
}

/// Severity of a threshold-crossed alert for the tier reached.
fn severity_for_tier(tier: DisciplineStatus) -> AlertSeverity {
    match tier {
        DisciplineStatus::Good => AlertSeverity::Low,
        DisciplineStatus::Warning => AlertSeverity::Medium,
        DisciplineStatus::Probation => AlertSeverity::High,
        DisciplineStatus::FinalWarning | DisciplineStatus::Termination => AlertSeverity::Critical,
    }
}
