//! # Occurrence Classifier
//!
//! Maps one raw attendance event to exactly one occurrence type and an
//! initial review status. Both functions are pure.
//!
//! ## Design
//!
//! Type selection is a fixed, first-match priority list, not a severity
//! weighting. An event carrying several signals at once (absent and flagged
//! for early departure, say) classifies as the highest-priority match and
//! the remaining signals are dropped. Only events with at least one
//! point-bearing signal should be handed to the classifier; callers gate on
//! [`AttendanceEvent::is_point_bearing`] first. The final branch keeps the
//! function total for anything that slips through.

use tally_core::OccurrenceType;

use crate::event::{AttendanceEvent, AttendanceStatus};
use crate::occurrence::ReviewStatus;

/// Classify an attendance event into exactly one occurrence type.
///
/// Priority order, first match wins:
///
/// 1. no-call-no-show flag
/// 2. attendance status of absent
/// 3. late flag
/// 4. early-departure flag
/// 5. unexcused absence, as the catch-all
pub fn classify(event: &AttendanceEvent) -> OccurrenceType {
    if event.no_call_no_show {
        OccurrenceType::NoCallNoShow
    } else if event.status == AttendanceStatus::Absent {
        OccurrenceType::Absent
    } else if event.late {
        OccurrenceType::Tardy
    } else if event.early_departure {
        OccurrenceType::EarlyOut
    } else {
        OccurrenceType::UnexcusedAbsence
    }
}

/// Determine the review status a fresh occurrence enters the ledger with.
///
/// Events carrying an approved exception are excused outright; events
/// already stamped with an approval arrive approved; everything else
/// starts pending supervisor review.
pub fn initial_review_status(event: &AttendanceEvent) -> ReviewStatus {
    if event.approved_exception {
        ReviewStatus::Excused
    } else if event.approved_at.is_some() {
        ReviewStatus::Approved
    } else {
        ReviewStatus::Pending
    }
}
