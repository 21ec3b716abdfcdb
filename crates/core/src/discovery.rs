//! Patient directory discovery.
//!
//! Walks a workspace looking for directories named `sub-*`. The walk never enters
//! `derivatives/` or `pipeline/` (they hold derived data keyed by patient id, not
//! patients), and never descends into a patient directory once it has been found:
//! `anat/`, `ses-01/` and friends are the resolver's business.
//!
//! [`discover`] reports every hit, duplicates included, shallowest first. [`PatientRegistry`]
//! turns that list into one entry per id, keeping the first path seen and recording the rest.

use crate::constants::EXCLUDED_DIR_NAMES;
use bidsprep_types::PatientId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Returns the absolute path of every patient directory under `workspace_root`.
///
/// A missing or non-directory root yields an empty list. Unreadable subdirectories are
/// logged and skipped. Results are in walk order: shallower directories first, then by
/// path within a depth.
pub fn discover(workspace_root: &Path) -> Vec<PathBuf> {
    if !workspace_root.is_dir() {
        tracing::debug!(
            "workspace root is not a directory: {}",
            workspace_root.display()
        );
        return Vec::new();
    }

    let mut patient_dirs = Vec::new();
    let mut walker = WalkDir::new(workspace_root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_excluded(e));

    loop {
        let entry = match walker.next() {
            None => break,
            Some(Ok(entry)) => entry,
            Some(Err(e)) => {
                tracing::warn!("skipping unreadable workspace entry: {}", e);
                continue;
            }
        };

        if !is_directory(&entry) {
            continue;
        }

        if PatientId::is_patient_dir_name(&entry.file_name().to_string_lossy()) {
            patient_dirs.push(entry.path().to_path_buf());
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
        }
    }

    patient_dirs.sort_by(|a, b| {
        a.components()
            .count()
            .cmp(&b.components().count())
            .then_with(|| a.cmp(b))
    });
    patient_dirs
}

fn is_excluded(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    EXCLUDED_DIR_NAMES.iter().any(|excluded| *excluded == name)
}

/// Directories and symlinks to directories. Symlinks are reported but never followed.
fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

/// A patient directory registered under its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDir {
    pub id: PatientId,
    pub path: PathBuf,
}

/// A later directory whose id was already registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientCollision {
    pub id: PatientId,
    pub kept: PathBuf,
    pub ignored: PathBuf,
}

/// Discovered patients keyed by id.
#[derive(Debug, Clone, Default)]
pub struct PatientRegistry {
    patients: BTreeMap<PatientId, PatientDir>,
    collisions: Vec<PatientCollision>,
}

impl PatientRegistry {
    /// Builds a registry from discovered paths.
    ///
    /// Paths are visited in the order given and the first path seen for an id wins; each
    /// later path with the same id is recorded as a collision and logged. Directory
    /// names that are not valid patient ids are skipped.
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut registry = Self::default();
        for path in paths {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };

            let id = match PatientId::new(&name) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("skipping patient directory {}: {}", path.display(), e);
                    continue;
                }
            };

            if let Some(existing) = registry.patients.get(&id) {
                tracing::warn!(
                    "duplicate patient id {}: keeping {}, ignoring {}",
                    id,
                    existing.path.display(),
                    path.display()
                );
                registry.collisions.push(PatientCollision {
                    id,
                    kept: existing.path.clone(),
                    ignored: path,
                });
                continue;
            }

            registry
                .patients
                .insert(id.clone(), PatientDir { id, path });
        }

        registry
    }

    /// Discovers and registers the patients under `workspace_root`.
    pub fn discover(workspace_root: &Path) -> Self {
        Self::from_paths(discover(workspace_root))
    }

    pub fn get(&self, id: &PatientId) -> Option<&PatientDir> {
        self.patients.get(id)
    }

    /// Patient ids in sorted order.
    pub fn ids(&self) -> Vec<PatientId> {
        self.patients.keys().cloned().collect()
    }

    /// Registered patients in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PatientDir> {
        self.patients.values()
    }

    pub fn collisions(&self) -> &[PatientCollision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

/// Sorted ids of the patients under `workspace_root`, one per id.
pub fn discover_patients(workspace_root: &Path) -> Vec<PatientId> {
    PatientRegistry::discover(workspace_root).ids()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn mkdir(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }

    #[test]
    fn test_discover_top_level_patients() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        mkdir(root, "sub-01/anat");
        mkdir(root, "sub-02/ses-01/pet");
        mkdir(root, "docs");

        let found = discover(root);

        assert_eq!(found, vec![root.join("sub-01"), root.join("sub-02")]);
    }

    #[test]
    fn test_discover_prunes_derivatives_and_pipeline() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        mkdir(root, "sub-01/anat");
        mkdir(root, "derivatives/sub-99/anat");
        mkdir(root, "derivatives/skullstrips/sub-01/anat");
        mkdir(root, "pipeline/sub-98");
        mkdir(root, "site/derivatives/sub-97");

        let ids = discover_patients(root);

        assert_eq!(ids, vec![PatientId::new("sub-01").unwrap()]);
    }

    #[test]
    fn test_discover_does_not_descend_into_patients() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        mkdir(root, "sub-01/sub-01-nested/anat");

        let found = discover(root);

        assert_eq!(found, vec![root.join("sub-01")]);
    }

    #[test]
    fn test_discover_nested_patients_and_ignores_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        mkdir(root, "site-a/sub-03/anat");
        fs::write(root.join("sub-notadir.txt"), b"").unwrap();

        let found = discover(root);

        assert_eq!(found, vec![root.join("site-a/sub-03")]);
    }

    #[test]
    fn test_discover_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(discover(&temp.path().join("missing")).is_empty());

        let file = temp.path().join("file");
        fs::write(&file, b"").unwrap();
        assert!(discover(&file).is_empty());
    }

    #[test]
    fn test_discover_root_named_pipeline_is_walked() {
        let temp = TempDir::new().unwrap();
        let root = mkdir(temp.path(), "pipeline");
        mkdir(&root, "sub-01");

        assert_eq!(discover(&root), vec![root.join("sub-01")]);
    }

    #[test]
    fn test_discover_orders_shallower_first() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        mkdir(root, "sub-02/anat");
        mkdir(root, "a-site/sub-01/anat");
        mkdir(root, "sub-03");

        assert_eq!(
            discover(root),
            vec![
                root.join("sub-02"),
                root.join("sub-03"),
                root.join("a-site/sub-01")
            ]
        );
    }

    #[test]
    fn test_discover_keeps_duplicates_registry_flags_them() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        mkdir(root, "sub-01/anat");
        mkdir(root, "backup/sub-01/anat");

        let found = discover(root);
        assert_eq!(found.len(), 2);

        let registry = PatientRegistry::from_paths(found);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.collisions().len(), 1);

        let id = PatientId::new("sub-01").unwrap();
        let kept = &registry.get(&id).unwrap().path;
        assert_eq!(kept, &root.join("sub-01"));
        assert_eq!(registry.collisions()[0].ignored, root.join("backup/sub-01"));
    }

    #[test]
    fn test_registry_first_given_path_wins() {
        let registry = PatientRegistry::from_paths(vec![
            PathBuf::from("/ws/z/sub-01"),
            PathBuf::from("/ws/a/sub-01"),
        ]);

        let id = PatientId::new("sub-01").unwrap();
        assert_eq!(registry.get(&id).unwrap().path, PathBuf::from("/ws/z/sub-01"));
        assert_eq!(registry.collisions()[0].ignored, PathBuf::from("/ws/a/sub-01"));
    }

    #[test]
    fn test_registry_skips_invalid_ids() {
        let registry = PatientRegistry::from_paths(vec![
            PathBuf::from("/ws/sub-01"),
            PathBuf::from("/ws/sub-.."),
        ]);

        assert_eq!(registry.ids(), vec![PatientId::new("sub-01").unwrap()]);
        assert!(registry.collisions().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_reports_symlinked_patient_without_following() {
        let temp = TempDir::new().unwrap();
        let root = mkdir(temp.path(), "ws");
        let outside = mkdir(temp.path(), "outside/sub-42");
        mkdir(&outside, "sub-43");
        std::os::unix::fs::symlink(&outside, root.join("sub-42")).unwrap();

        assert_eq!(discover(&root), vec![root.join("sub-42")]);
    }
}
