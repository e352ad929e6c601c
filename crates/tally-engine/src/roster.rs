//! # Department Roster
//!
//! Maps employees to their departments for summary grouping. The engine
//! does not own employee records; it only needs to know, for department
//! rollups, who belongs where.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use tally_core::{DepartmentId, EmployeeId};

/// Thread-safe, cloneable employee-to-department registry.
///
/// An employee belongs to at most one department; reassignment moves
/// them.
#[derive(Debug)]
pub struct Roster {
    assignments: Arc<RwLock<HashMap<EmployeeId, DepartmentId>>>,
}

impl Clone for Roster {
    fn clone(&self) -> Self {
        Self {
            assignments: Arc::clone(&self.assignments),
        }
    }
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self {
            assignments: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Assign an employee to a department, returning the previous
    /// assignment if this was a move.
    pub fn assign(
        &self,
        employee_id: EmployeeId,
        department_id: DepartmentId,
    ) -> Option<DepartmentId> {
        self.assignments.write().insert(employee_id, department_id)
    }

    /// Look up an employee's department.
    pub fn department_of(&self, employee_id: &EmployeeId) -> Option<DepartmentId> {
        self.assignments.read().get(employee_id).cloned()
    }

    /// Whether an employee has a department assignment.
    pub fn is_assigned(&self, employee_id: &EmployeeId) -> bool {
        self.assignments.read().contains_key(employee_id)
    }

    /// A department's members, sorted by id for stable iteration.
    pub fn members(&self, department_id: &DepartmentId) -> Vec<EmployeeId> {
        let mut members: Vec<EmployeeId> = self
            .assignments
            .read()
            .iter()
            .filter(|(_, dept)| *dept == department_id)
            .map(|(employee, _)| employee.clone())
            .collect();
        members.sort_by_key(|id| *id.as_uuid());
        members
    }

    /// Every department with at least one member, sorted by id.
    pub fn departments(&self) -> Vec<DepartmentId> {
        let mut departments: Vec<DepartmentId> =
            self.assignments.read().values().cloned().collect();
        departments.sort_by_key(|id| *id.as_uuid());
        departments.dedup();
        departments
    }

    /// Number of assigned employees.
    pub fn len(&self) -> usize {
        self.assignments.read().len()
    }

    /// Whether nobody is assigned anywhere.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_assign_and_lookup() {
        let roster = Roster::new();
        let employee = EmployeeId::new();
        let department = DepartmentId::new();

        assert!(roster.assign(employee.clone(), department.clone()).is_none());
        assert_eq!(roster.department_of(&employee), Some(department.clone()));
        assert!(roster.is_assigned(&employee));
        assert_eq!(roster.members(&department), vec![employee]);
    }

    #[test]
    fn roster_reassignment_moves_the_employee() {
        let roster = Roster::new();
        let employee = EmployeeId::new();
        let shipping = DepartmentId::new();
        let receiving = DepartmentId::new();

        roster.assign(employee.clone(), shipping.clone());
        let previous = roster.assign(employee.clone(), receiving.clone());

        assert_eq!(previous, Some(shipping.clone()));
        assert!(roster.members(&shipping).is_empty());
        assert_eq!(roster.members(&receiving), vec![employee]);
    }

    #[test]
    fn roster_members_are_sorted() {
        let roster = Roster::new();
        let department = DepartmentId::new();
        for _ in 0..5 {
            roster.assign(EmployeeId::new(), department.clone());
        }

        let members = roster.members(&department);
        assert_eq!(members.len(), 5);
        for pair in members.windows(2) {
            assert!(pair[0].as_uuid() < pair[1].as_uuid());
        }
    }

    #[test]
    fn roster_departments_are_deduped() {
        let roster = Roster::new();
        let department = DepartmentId::new();
        roster.assign(EmployeeId::new(), department.clone());
        roster.assign(EmployeeId::new(), department.clone());
        roster.assign(EmployeeId::new(), DepartmentId::new());

        assert_eq!(roster.departments().len(), 2);
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn roster_clone_shares_assignments() {
        let roster = Roster::new();
        let clone = roster.clone();
        clone.assign(EmployeeId::new(), DepartmentId::new());
        assert_eq!(roster.len(), 1);
    }
}
