//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in the attendance engine.
//! These prevent accidental identifier confusion — you cannot pass an
//! `EmployeeId` where an `OccurrenceId` is expected.
//!
//! Employee and supervisor identifiers are distinct types even though a
//! supervisor is also an employee of the organization: the engine never
//! treats the reviewer of an occurrence as its subject, and the type system
//! enforces that.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an employee whose attendance is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub Uuid);

/// Unique identifier for a supervisor acting in a review capacity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupervisorId(pub Uuid);

/// Unique identifier for a department (the aggregation grouping).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartmentId(pub Uuid);

/// Unique identifier for a classified attendance occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccurrenceId(pub Uuid);

/// Unique identifier for a generated alert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertId(pub Uuid);

impl EmployeeId {
    /// Generate a new random employee identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl SupervisorId {
    /// Generate a new random supervisor identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl DepartmentId {
    /// Generate a new random department identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl OccurrenceId {
    /// Generate a new random occurrence identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AlertId {
    /// Generate a new random alert identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "employee:{}", self.0)
    }
}

impl std::fmt::Display for SupervisorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "supervisor:{}", self.0)
    }
}

impl std::fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "department:{}", self.0)
    }
}

impl std::fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "occurrence:{}", self.0)
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "alert:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let a = EmployeeId::new();
        let b = EmployeeId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_prefixes() {
        let employee = EmployeeId::new();
        let occurrence = OccurrenceId::new();
        let alert = AlertId::new();
        assert!(employee.to_string().starts_with("employee:"));
        assert!(occurrence.to_string().starts_with("occurrence:"));
        assert!(alert.to_string().starts_with("alert:"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = OccurrenceId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: OccurrenceId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_display_embeds_uuid() {
        let id = DepartmentId::new();
        assert_eq!(id.to_string(), format!("department:{}", id.as_uuid()));
    }
}
