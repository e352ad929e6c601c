//! # Error Types — Structured Error Hierarchy
//!
//! Defines the single error type surfaced by the attendance engine. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Policy validation failures are fatal at load time and name the
//!   violating option.
//! - State machine rejections name the current and attempted states.
//! - Write conflicts name the record and both versions so the caller can
//!   refetch and retry.
//! - Callers branch on the error kind, never on message text.

use thiserror::Error;

/// Top-level error type for the attendance engine.
#[derive(Error, Debug)]
pub enum TallyError {
    /// A policy configuration failed validation at load time.
    ///
    /// Fatal: the engine refuses to run with an unvalidated policy.
    #[error("invalid policy: {reason}")]
    InvalidPolicy {
        /// The violated constraint, naming the offending option.
        reason: String,
    },

    /// An occurrence review transition was rejected by the state machine.
    ///
    /// Recoverable: the record is unchanged.
    #[error("invalid occurrence transition: {from} -> {to}")]
    InvalidTransition {
        /// Current review status.
        from: String,
        /// Attempted target status.
        to: String,
    },

    /// A concurrent writer changed the record between read and write.
    ///
    /// Recoverable: the caller should refetch the record and retry.
    #[error("write conflict on {id}: expected version {expected}, found {found}")]
    Conflict {
        /// The contended record.
        id: String,
        /// The version the caller read.
        expected: u64,
        /// The version actually stored.
        found: u64,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// What kind of record was looked up.
        entity: String,
        /// The identifier that missed.
        id: String,
    },
}

impl TallyError {
    /// Build a `NotFound` error for a record kind and identifier.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}
