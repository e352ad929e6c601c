//! # Occurrence Review State Machine
//!
//! Models the review lifecycle of a classified attendance occurrence, from
//! recording through approval, excusal, dispute, or expiration.
//!
//! ## States
//!
//! ```text
//! Pending ──▶ Approved ──▶ Excused (terminal)
//!    │            │
//!    │            └──▶ Expired (terminal)
//!    │
//!    ├──▶ Disputed ──▶ Approved (upheld)
//!    │       └──────▶ Excused (terminal)
//!    │
//!    ├──▶ Excused (terminal)
//!    └──▶ Expired (terminal)
//! ```
//!
//! Pending and approved occurrences count toward the active point total
//! until their expiration date; excusal removes the points immediately and
//! permanently. Expiration is reached either by the sweep or, date-wise, by
//! any active-point query that runs after the expiration date.
//!
//! ## Versioning
//!
//! Every applied transition appends to the audit log and increments
//! `version`. The store's compare-and-swap uses the version to reject
//! writes from callers holding a stale snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tally_core::{EmployeeId, OccurrenceId, OccurrenceType, SupervisorId, TallyError, Timestamp};

// ─── Review Status ───────────────────────────────────────────────────

/// The review lifecycle state of an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Recorded, awaiting supervisor review.
    Pending,
    /// Reviewed and upheld; counts toward the point total.
    Approved,
    /// Forgiven; never counts again (terminal).
    Excused,
    /// Contested by the employee, awaiting resolution.
    Disputed,
    /// Rolled off the ledger by the expiration window (terminal).
    Expired,
}

impl ReviewStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Excused | Self::Expired)
    }

    /// Whether an occurrence in this status counts toward the active
    /// point total (subject to its expiration date).
    pub fn is_countable(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Excused => "excused",
            Self::Disputed => "disputed",
            Self::Expired => "expired",
        }
    }

    /// Return all review status variants.
    pub fn all() -> &'static [ReviewStatus] {
        &[
            Self::Pending,
            Self::Approved,
            Self::Excused,
            Self::Disputed,
            Self::Expired,
        ]
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Review Evidence ─────────────────────────────────────────────────

/// Evidence for a review transition.
///
/// Approvals and excusals are supervisor actions; disputes are raised by
/// the employee (possibly entered on their behalf), so the supervisor is
/// optional.
#[derive(Debug, Clone)]
pub struct ReviewEvidence {
    /// Supervisor acting on the occurrence, if one.
    pub supervisor: Option<SupervisorId>,
    /// Free-text justification.
    pub note: Option<String>,
}

impl ReviewEvidence {
    /// Evidence attributed to a supervisor.
    pub fn by(supervisor: SupervisorId) -> Self {
        Self {
            supervisor: Some(supervisor),
            note: None,
        }
    }

    /// Evidence with no acting supervisor (employee-raised disputes).
    pub fn unattributed() -> Self {
        Self {
            supervisor: None,
            note: None,
        }
    }

    /// Builder: attach a justification note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Record of a single review transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrenceTransitionRecord {
    /// Status before the transition.
    pub from_status: ReviewStatus,
    /// Status after the transition.
    pub to_status: ReviewStatus,
    /// When the transition was applied.
    pub timestamp: Timestamp,
    /// Supervisor who acted, if any (system sweeps record none).
    pub supervisor: Option<SupervisorId>,
    /// Free-text justification, if given.
    pub note: Option<String>,
}

// ─── Occurrence ──────────────────────────────────────────────────────

/// A classified attendance occurrence on an employee's ledger.
///
/// The point value is fixed at classification time from the policy then in
/// force; later policy edits never rewrite it. The review status is the
/// only mutable business field, and every change is logged in
/// `transitions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occurrence {
    /// Unique occurrence identifier.
    pub id: OccurrenceId,
    /// The employee whose ledger this occurrence sits on.
    pub employee_id: EmployeeId,
    /// Classified infraction type.
    pub occurrence_type: OccurrenceType,
    /// Current review status.
    pub status: ReviewStatus,
    /// Point value assigned at classification time.
    pub points: f64,
    /// The workday the infraction happened on.
    pub occurred_on: NaiveDate,
    /// Minutes late, for tardies with a usable punch pair.
    pub minutes_late: Option<i64>,
    /// The date this occurrence rolls off the ledger.
    pub expires_on: NaiveDate,
    /// Free-text reason or notes carried from the source event.
    pub notes: Option<String>,
    /// The supervisor who last acted on this occurrence, if any.
    pub reviewed_by: Option<SupervisorId>,
    /// Optimistic-concurrency counter; incremented on every transition.
    pub version: u64,
    /// Ordered log of all review transitions.
    pub transitions: Vec<OccurrenceTransitionRecord>,
    /// When the occurrence was recorded.
    pub created_at: Timestamp,
}

impl Occurrence {
    /// Create a new occurrence.
    ///
    /// `initial_status` comes from the source event's approval fields (see
    /// [`crate::classify::initial_review_status`]): occurrences enter the
    /// ledger as pending, approved, or excused.
    pub fn new(
        employee_id: EmployeeId,
        occurrence_type: OccurrenceType,
        points: f64,
        occurred_on: NaiveDate,
        expires_on: NaiveDate,
        initial_status: ReviewStatus,
    ) -> Self {
        Self {
            id: OccurrenceId::new(),
            employee_id,
            occurrence_type,
            status: initial_status,
            points,
            occurred_on,
            minutes_late: None,
            expires_on,
            notes: None,
            reviewed_by: None,
            version: 1,
            transitions: Vec::new(),
            created_at: Timestamp::now(),
        }
    }

    /// Builder: attach the derived minutes-late attribute.
    pub fn with_minutes_late(mut self, minutes: i64) -> Self {
        self.minutes_late = Some(minutes);
        self
    }

    /// Builder: attach free-text notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder: record the supervisor behind a born-approved or
    /// born-excused occurrence.
    pub fn with_reviewer(mut self, supervisor: SupervisorId) -> Self {
        self.reviewed_by = Some(supervisor);
        self
    }

    /// Builder: backdate the recording timestamp (imports, tests).
    pub fn with_created_at(mut self, at: Timestamp) -> Self {
        self.created_at = at;
        self
    }

    /// Approve the occurrence (PENDING or DISPUTED → APPROVED).
    pub fn approve(&mut self, evidence: ReviewEvidence) -> Result<(), TallyError> {
        self.require_any(
            &[ReviewStatus::Pending, ReviewStatus::Disputed],
            ReviewStatus::Approved,
        )?;
        self.do_transition(ReviewStatus::Approved, evidence);
        Ok(())
    }

    /// Excuse the occurrence (PENDING, APPROVED, or DISPUTED → EXCUSED).
    ///
    /// Excusal is terminal: the points come off the balance immediately
    /// and the occurrence never counts again.
    pub fn excuse(&mut self, evidence: ReviewEvidence) -> Result<(), TallyError> {
        self.require_any(
            &[
                ReviewStatus::Pending,
                ReviewStatus::Approved,
                ReviewStatus::Disputed,
            ],
            ReviewStatus::Excused,
        )?;
        self.do_transition(ReviewStatus::Excused, evidence);
        Ok(())
    }

    /// Contest the occurrence (PENDING → DISPUTED).
    ///
    /// A disputed occurrence keeps counting toward nothing — it is out of
    /// the active total until resolved one way or the other.
    pub fn dispute(&mut self, evidence: ReviewEvidence) -> Result<(), TallyError> {
        self.require_any(&[ReviewStatus::Pending], ReviewStatus::Disputed)?;
        self.do_transition(ReviewStatus::Disputed, evidence);
        Ok(())
    }

    /// Expire the occurrence (PENDING or APPROVED → EXPIRED).
    ///
    /// A system action applied by the expiration sweep; no supervisor is
    /// recorded.
    pub fn expire(&mut self) -> Result<(), TallyError> {
        self.require_any(
            &[ReviewStatus::Pending, ReviewStatus::Approved],
            ReviewStatus::Expired,
        )?;
        self.do_transition(ReviewStatus::Expired, ReviewEvidence::unattributed());
        Ok(())
    }

    /// Whether this occurrence counts toward the active point total as of
    /// the given date.
    ///
    /// Date-aware: an occurrence past its expiration date stops counting
    /// even before a sweep has marked it expired.
    pub fn is_active(&self, as_of: NaiveDate) -> bool {
        self.status.is_countable() && as_of < self.expires_on
    }

    /// Whether this occurrence is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Validate that the current status allows a transition to `target`.
    fn require_any(&self, allowed: &[ReviewStatus], target: ReviewStatus) -> Result<(), TallyError> {
        if !allowed.contains(&self.status) {
            return Err(TallyError::InvalidTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    /// Record a review transition and bump the version.
    fn do_transition(&mut self, to: ReviewStatus, evidence: ReviewEvidence) {
        self.transitions.push(OccurrenceTransitionRecord {
            from_status: self.status,
            to_status: to,
            timestamp: Timestamp::now(),
            supervisor: evidence.supervisor.clone(),
            note: evidence.note,
        });
        if let Some(supervisor) = evidence.supervisor {
            self.reviewed_by = Some(supervisor);
        }
        self.status = to;
        self.version += 1;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence(note: &str) -> ReviewEvidence {
        ReviewEvidence::by(SupervisorId::new()).with_note(note)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn make_pending() -> Occurrence {
        Occurrence::new(
            EmployeeId::new(),
            OccurrenceType::Tardy,
            1.0,
            d(2026, 3, 2),
            d(2027, 3, 2),
            ReviewStatus::Pending,
        )
    }

    // ── Happy-path lifecycle tests ───────────────────────────────────

    #[test]
    fn test_new_occurrence_is_version_one() {
        let occ = make_pending();
        assert_eq!(occ.status, ReviewStatus::Pending);
        assert_eq!(occ.version, 1);
        assert!(occ.transitions.is_empty());
        assert!(occ.reviewed_by.is_none());
    }

    #[test]
    fn test_pending_to_approved() {
        let mut occ = make_pending();
        occ.approve(evidence("verified against punch record")).unwrap();
        assert_eq!(occ.status, ReviewStatus::Approved);
        assert_eq!(occ.version, 2);
        assert_eq!(occ.transitions.len(), 1);
        assert!(occ.reviewed_by.is_some());
    }

    #[test]
    fn test_pending_to_excused() {
        let mut occ = make_pending();
        occ.excuse(evidence("doctor's note provided")).unwrap();
        assert_eq!(occ.status, ReviewStatus::Excused);
        assert!(occ.is_terminal());
    }

    #[test]
    fn test_pending_to_disputed() {
        let mut occ = make_pending();
        occ.dispute(ReviewEvidence::unattributed().with_note("badge reader failed"))
            .unwrap();
        assert_eq!(occ.status, ReviewStatus::Disputed);
        assert!(occ.reviewed_by.is_none());
    }

    #[test]
    fn test_pending_to_expired() {
        let mut occ = make_pending();
        occ.expire().unwrap();
        assert_eq!(occ.status, ReviewStatus::Expired);
        assert!(occ.is_terminal());
    }

    #[test]
    fn test_approved_to_excused() {
        let mut occ = make_pending();
        occ.approve(evidence("upheld")).unwrap();
        occ.excuse(evidence("late excuse accepted")).unwrap();
        assert_eq!(occ.status, ReviewStatus::Excused);
    }

    #[test]
    fn test_approved_to_expired() {
        let mut occ = make_pending();
        occ.approve(evidence("upheld")).unwrap();
        occ.expire().unwrap();
        assert_eq!(occ.status, ReviewStatus::Expired);
    }

    #[test]
    fn test_disputed_to_approved() {
        let mut occ = make_pending();
        occ.dispute(ReviewEvidence::unattributed()).unwrap();
        occ.approve(evidence("dispute rejected")).unwrap();
        assert_eq!(occ.status, ReviewStatus::Approved);
    }

    #[test]
    fn test_disputed_to_excused() {
        let mut occ = make_pending();
        occ.dispute(ReviewEvidence::unattributed()).unwrap();
        occ.excuse(evidence("dispute upheld")).unwrap();
        assert_eq!(occ.status, ReviewStatus::Excused);
    }

    #[test]
    fn test_full_lifecycle_dispute_then_expire() {
        let mut occ = make_pending();
        occ.dispute(ReviewEvidence::unattributed()).unwrap();
        occ.approve(evidence("dispute rejected")).unwrap();
        occ.expire().unwrap();

        assert!(occ.is_terminal());
        assert_eq!(occ.transitions.len(), 3);
        assert_eq!(occ.version, 4);
    }

    // ── Invalid transition tests ─────────────────────────────────────

    #[test]
    fn test_cannot_dispute_approved() {
        let mut occ = make_pending();
        occ.approve(evidence("upheld")).unwrap();
        assert!(occ.dispute(ReviewEvidence::unattributed()).is_err());
    }

    #[test]
    fn test_cannot_approve_twice() {
        let mut occ = make_pending();
        occ.approve(evidence("upheld")).unwrap();
        assert!(occ.approve(evidence("again")).is_err());
    }

    #[test]
    fn test_cannot_expire_disputed() {
        let mut occ = make_pending();
        occ.dispute(ReviewEvidence::unattributed()).unwrap();
        assert!(occ.expire().is_err());
    }

    #[test]
    fn test_cannot_transition_from_excused() {
        let mut occ = make_pending();
        occ.excuse(evidence("excused")).unwrap();
        assert!(occ.approve(evidence("late approval")).is_err());
        assert!(occ.dispute(ReviewEvidence::unattributed()).is_err());
        assert!(occ.expire().is_err());
        assert!(occ.excuse(evidence("again")).is_err());
    }

    #[test]
    fn test_cannot_transition_from_expired() {
        let mut occ = make_pending();
        occ.expire().unwrap();
        assert!(occ.approve(evidence("too late")).is_err());
        assert!(occ.excuse(evidence("too late")).is_err());
    }

    #[test]
    fn test_rejected_transition_leaves_record_unchanged() {
        let mut occ = make_pending();
        occ.excuse(evidence("excused")).unwrap();
        let version_before = occ.version;
        let transitions_before = occ.transitions.len();

        let err = occ.approve(evidence("should fail")).unwrap_err();
        assert!(matches!(err, TallyError::InvalidTransition { .. }));
        assert_eq!(occ.version, version_before);
        assert_eq!(occ.transitions.len(), transitions_before);
        assert_eq!(occ.status, ReviewStatus::Excused);
    }

    // ── Transition log ───────────────────────────────────────────────

    #[test]
    fn test_transition_record_contents() {
        let supervisor = SupervisorId::new();
        let mut occ = make_pending();
        occ.approve(ReviewEvidence::by(supervisor.clone()).with_note("checked punches"))
            .unwrap();

        let record = &occ.transitions[0];
        assert_eq!(record.from_status, ReviewStatus::Pending);
        assert_eq!(record.to_status, ReviewStatus::Approved);
        assert_eq!(record.supervisor, Some(supervisor.clone()));
        assert_eq!(record.note.as_deref(), Some("checked punches"));
        assert_eq!(occ.reviewed_by, Some(supervisor));
    }

    #[test]
    fn test_sweep_expiry_records_no_supervisor() {
        let mut occ = make_pending();
        occ.expire().unwrap();
        assert!(occ.transitions[0].supervisor.is_none());
        assert!(occ.reviewed_by.is_none());
    }

    // ── Active-point accounting ──────────────────────────────────────

    #[test]
    fn test_pending_counts_before_expiration() {
        let occ = make_pending();
        assert!(occ.is_active(d(2026, 6, 1)));
    }

    #[test]
    fn test_not_active_on_expiration_date() {
        let occ = make_pending();
        assert!(!occ.is_active(d(2027, 3, 2)));
        assert!(!occ.is_active(d(2027, 3, 3)));
    }

    #[test]
    fn test_excused_never_counts() {
        let mut occ = make_pending();
        occ.excuse(evidence("excused")).unwrap();
        assert!(!occ.is_active(d(2026, 6, 1)));
    }

    #[test]
    fn test_disputed_does_not_count_until_resolved() {
        let mut occ = make_pending();
        occ.dispute(ReviewEvidence::unattributed()).unwrap();
        assert!(!occ.is_active(d(2026, 6, 1)));

        occ.approve(evidence("dispute rejected")).unwrap();
        assert!(occ.is_active(d(2026, 6, 1)));
    }

    // ── Status enum ──────────────────────────────────────────────────

    #[test]
    fn test_status_terminality() {
        assert!(ReviewStatus::Excused.is_terminal());
        assert!(ReviewStatus::Expired.is_terminal());
        assert!(!ReviewStatus::Pending.is_terminal());
        assert!(!ReviewStatus::Approved.is_terminal());
        assert!(!ReviewStatus::Disputed.is_terminal());
    }

    #[test]
    fn test_status_countability() {
        assert!(ReviewStatus::Pending.is_countable());
        assert!(ReviewStatus::Approved.is_countable());
        assert!(!ReviewStatus::Disputed.is_countable());
        assert!(!ReviewStatus::Excused.is_countable());
        assert!(!ReviewStatus::Expired.is_countable());
    }

    #[test]
    fn test_status_serde_format() {
        for status in ReviewStatus::all() {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_occurrence_serde_roundtrip() {
        let mut occ = make_pending().with_minutes_late(12).with_notes("flat tire");
        occ.approve(evidence("verified")).unwrap();

        let json = serde_json::to_string(&occ).unwrap();
        let parsed: Occurrence = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, occ.id);
        assert_eq!(parsed.status, ReviewStatus::Approved);
        assert_eq!(parsed.version, 2);
        assert_eq!(parsed.minutes_late, Some(12));
        assert_eq!(parsed.transitions.len(), 1);
    }
}
