//! Workspace status scans.
//!
//! A scan discovers every patient and resolves its requirements against the directory
//! the patient was actually found in. The result is a snapshot: nothing is cached
//! between scans, so a refresh is simply a new scan.

use crate::discovery::PatientRegistry;
use crate::matching::relative_posix;
use crate::paths::PatternCatalog;
use crate::requirements::{resolve_with, RequirementStatus};
use crate::selection::PatientSelection;
use bidsprep_types::PatientId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Requirement status of one discovered patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientStatus {
    pub id: PatientId,
    pub path: PathBuf,
    pub status: RequirementStatus,
}

/// Patient counts for summary displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub total: usize,
    pub eligible: usize,
    pub selected: usize,
    pub not_eligible: usize,
}

/// Status of every patient found in one scan, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceStatus {
    patients: BTreeMap<PatientId, PatientStatus>,
}

impl WorkspaceStatus {
    pub fn get(&self, id: &PatientId) -> Option<&PatientStatus> {
        self.patients.get(id)
    }

    pub fn is_eligible(&self, id: &PatientId) -> bool {
        self.patients
            .get(id)
            .is_some_and(|patient| patient.status.eligible)
    }

    /// Eligible patient ids in sorted order.
    pub fn eligible_patients(&self) -> Vec<PatientId> {
        self.patients
            .values()
            .filter(|patient| patient.status.eligible)
            .map(|patient| patient.id.clone())
            .collect()
    }

    /// Patients in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PatientStatus> {
        self.patients.values()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Counts derived from this scan and a caller-held selection.
    ///
    /// `selected` counts the selection as given, even ids this scan does not know.
    pub fn summary(&self, selection: &PatientSelection) -> StatusSummary {
        let total = self.patients.len();
        let eligible = self
            .patients
            .values()
            .filter(|patient| patient.status.eligible)
            .count();

        StatusSummary {
            total,
            eligible,
            selected: selection.len(),
            not_eligible: total - eligible,
        }
    }
}

/// Discovers and resolves every patient under `workspace_root`.
pub fn scan_workspace(workspace_root: &Path) -> WorkspaceStatus {
    let registry = PatientRegistry::discover(workspace_root);

    let patients = registry
        .iter()
        .map(|dir| {
            let raw_dir = relative_posix(workspace_root, &dir.path)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(dir.id.as_str()));
            let catalog = PatternCatalog::at(&dir.id, raw_dir);
            let status = PatientStatus {
                id: dir.id.clone(),
                path: dir.path.clone(),
                status: resolve_with(workspace_root, &catalog),
            };
            (dir.id.clone(), status)
        })
        .collect();

    WorkspaceStatus { patients }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn id(s: &str) -> PatientId {
        PatientId::new(s).unwrap()
    }

    fn workspace() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for p in ["sub-01", "sub-02"] {
            touch(root, &format!("{p}/anat/{p}_flair.nii.gz"));
            touch(root, &format!("derivatives/skullstrips/{p}/anat/{p}_brain.nii.gz"));
            touch(root, &format!("derivatives/manual_masks/{p}/anat/{p}_mask.nii.gz"));
        }
        touch(root, "sub-03/anat/sub-03_flair.nii.gz");
        temp
    }

    #[test]
    fn test_scan_workspace_statuses() {
        let temp = workspace();
        let status = scan_workspace(temp.path());

        assert_eq!(status.len(), 3);
        assert_eq!(status.eligible_patients(), vec![id("sub-01"), id("sub-02")]);
        assert!(!status.is_eligible(&id("sub-03")));
        assert!(!status.is_eligible(&id("sub-99")));
        assert_eq!(status.get(&id("sub-03")).unwrap().status.missing_files.len(), 2);
    }

    #[test]
    fn test_summary_counts() {
        let temp = workspace();
        let status = scan_workspace(temp.path());
        let mut selection = PatientSelection::new();
        selection.add(id("sub-01"));

        assert_eq!(
            status.summary(&selection),
            StatusSummary {
                total: 3,
                eligible: 2,
                selected: 1,
                not_eligible: 1,
            }
        );
    }

    #[test]
    fn test_scan_uses_nested_patient_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "site-a/sub-04/anat/sub-04_flair.nii");
        touch(root, "derivatives/skullstrips/sub-04/anat/sub-04_brain.nii");
        touch(root, "derivatives/deep_learning_seg/sub-04/anat/sub-04_seg.nii");

        let status = scan_workspace(root);
        let patient = status.get(&id("sub-04")).unwrap();

        assert_eq!(patient.path, root.join("site-a/sub-04"));
        assert!(patient.status.eligible);
    }

    #[test]
    fn test_scan_prefers_top_level_duplicate() {
        let temp = workspace();
        let root = temp.path();
        fs::create_dir_all(root.join("backup/sub-01/anat")).unwrap();

        let status = scan_workspace(root);
        let patient = status.get(&id("sub-01")).unwrap();

        assert_eq!(patient.path, root.join("sub-01"));
        assert!(patient.status.eligible);
        assert_eq!(status.len(), 3);
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let status = scan_workspace(&temp.path().join("missing"));

        assert!(status.is_empty());
        assert_eq!(
            status.summary(&PatientSelection::new()),
            StatusSummary::default()
        );
    }
}
