//! # Occurrence Store
//!
//! Thread-safe, cloneable in-memory store for occurrences, indexed by
//! occurrence id and by employee.
//!
//! ## Concurrency
//!
//! All operations are synchronous (the RwLock is `parking_lot`, not an
//! async lock) and the lock is never held across anything slower than a
//! clone. `parking_lot::RwLock` is non-poisonable — a panicking writer does
//! not permanently corrupt the store.
//!
//! Review mutations go through [`OccurrenceStore::apply`], which checks the
//! caller's expected record version under the same write lock that runs the
//! mutation. Two reviewers racing on one occurrence resolve
//! deterministically: one write lands, the other gets `Conflict` and must
//! refetch. Readers always observe a record either before or after a
//! transition, never mid-mutation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use tally_core::{EmployeeId, OccurrenceId, TallyError};

use crate::occurrence::Occurrence;

#[derive(Debug, Default)]
struct Inner {
    occurrences: HashMap<OccurrenceId, Occurrence>,
    /// Per-employee occurrence ids in recording order.
    by_employee: HashMap<EmployeeId, Vec<OccurrenceId>>,
}

/// Thread-safe, cloneable in-memory occurrence store.
#[derive(Debug)]
pub struct OccurrenceStore {
    inner: Arc<RwLock<Inner>>,
}

impl Clone for OccurrenceStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl OccurrenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Insert an occurrence, returning the previous value if the id existed.
    pub fn insert(&self, occurrence: Occurrence) -> Option<Occurrence> {
        let mut guard = self.inner.write();
        let id = occurrence.id.clone();
        let employee_id = occurrence.employee_id.clone();
        let previous = guard.occurrences.insert(id.clone(), occurrence);
        if previous.is_none() {
            guard.by_employee.entry(employee_id).or_default().push(id);
        }
        previous
    }

    /// Retrieve an occurrence by id.
    pub fn get(&self, id: &OccurrenceId) -> Option<Occurrence> {
        self.inner.read().occurrences.get(id).cloned()
    }

    /// List all occurrences, in no particular order.
    pub fn list(&self) -> Vec<Occurrence> {
        self.inner.read().occurrences.values().cloned().collect()
    }

    /// List one employee's occurrences in recording order.
    pub fn for_employee(&self, employee_id: &EmployeeId) -> Vec<Occurrence> {
        let guard = self.inner.read();
        match guard.by_employee.get(employee_id) {
            Some(ids) => ids
                .iter()
                .filter_map(|id| guard.occurrences.get(id).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// List every employee with at least one recorded occurrence.
    ///
    /// Sorted by id so that report and sweep iteration order is stable
    /// across runs.
    pub fn employees(&self) -> Vec<EmployeeId> {
        let mut ids: Vec<EmployeeId> = self.inner.read().by_employee.keys().cloned().collect();
        ids.sort_by_key(|id| *id.as_uuid());
        ids
    }

    /// Atomically read-validate-update an occurrence.
    ///
    /// The closure runs under a single write lock, after two checks in
    /// order: the record must exist (`NotFound`) and its stored version
    /// must equal `expected_version` (`Conflict`). The version gate comes
    /// first so a caller holding a stale snapshot of a since-finalized
    /// record learns about the lost race, not about the terminal state.
    pub fn apply<R>(
        &self,
        id: &OccurrenceId,
        expected_version: u64,
        f: impl FnOnce(&mut Occurrence) -> Result<R, TallyError>,
    ) -> Result<R, TallyError> {
        let mut guard = self.inner.write();
        let occurrence = guard
            .occurrences
            .get_mut(id)
            .ok_or_else(|| TallyError::not_found("occurrence", id))?;
        if occurrence.version != expected_version {
            return Err(TallyError::Conflict {
                id: id.to_string(),
                expected: expected_version,
                found: occurrence.version,
            });
        }
        f(occurrence)
    }

    /// Visit every occurrence mutably under one write lock.
    ///
    /// Used by the expiration sweep so the whole pass is a single atomic
    /// step with respect to readers.
    pub fn for_each_mut(&self, mut f: impl FnMut(&mut Occurrence)) {
        let mut guard = self.inner.write();
        for occurrence in guard.occurrences.values_mut() {
            f(occurrence);
        }
    }

    /// Check if an occurrence exists.
    pub fn contains(&self, id: &OccurrenceId) -> bool {
        self.inner.read().occurrences.contains_key(id)
    }

    /// Return the number of stored occurrences.
    pub fn len(&self) -> usize {
        self.inner.read().occurrences.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for OccurrenceStore {
    fn default() -> Self {
        Self::new()
    }
}
