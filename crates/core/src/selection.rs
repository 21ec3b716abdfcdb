//! Patient selection tracking.
//!
//! The selection is plain owned state: a sorted set of patient ids changed only through
//! the methods below. Front ends render it; they do not keep a copy of their own.

use crate::scan::WorkspaceStatus;
use bidsprep_types::PatientId;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientSelection {
    ids: BTreeSet<PatientId>,
}

impl PatientSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id`. Returns `false` if it was already selected.
    pub fn add(&mut self, id: PatientId) -> bool {
        self.ids.insert(id)
    }

    /// Removes `id`. Returns `false` if it was not selected.
    pub fn remove(&mut self, id: &PatientId) -> bool {
        self.ids.remove(id)
    }

    /// Flips the selection state of `id` and returns the new state.
    pub fn toggle(&mut self, id: PatientId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &PatientId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &PatientId> {
        self.ids.iter()
    }

    /// Selects every eligible patient in `status`.
    pub fn select_all_eligible(&mut self, status: &WorkspaceStatus) {
        self.ids.extend(status.eligible_patients());
    }

    /// Drops ids that `status` does not know or no longer considers eligible.
    ///
    /// Applied after a refresh so that selections survive only while still valid.
    pub fn retain_eligible(&mut self, status: &WorkspaceStatus) {
        self.ids.retain(|id| status.is_eligible(id));
    }

    /// At least one patient is selected.
    pub fn is_ready_to_advance(&self) -> bool {
        !self.ids.is_empty()
    }
}

impl FromIterator<PatientId> for PatientSelection {
    fn from_iter<I: IntoIterator<Item = PatientId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
