//! Configuration assembly.
//!
//! Resolves every pipeline input for a set of patients into one [`PatientConfigEntry`]
//! each. A role that matches several files keeps the first match (pattern order, then
//! file name order) and flags the patient with `need_revision`; ambiguity is reported,
//! never fatal.
//!
//! The assembler does not check eligibility. Callers decide which patients to pass in.

use crate::constants::SIDECAR_EXTENSION;
use crate::matching::{find_matches, relative_posix};
use crate::paths::{FileRole, PatternCatalog};
use bidsprep_types::PatientId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Pipeline inputs for one patient.
///
/// Paths are relative to the workspace root and `/`-separated. Field order is the
/// on-disk order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientConfigEntry {
    /// FLAIR MRI.
    pub mri: Option<String>,
    /// Skull-stripped MRI.
    pub mri_str: Option<String>,
    /// Static PET.
    pub pet: Option<String>,
    /// Dynamic (4D) PET.
    pub pet4d: Option<String>,
    /// JSON sidecar of the dynamic PET.
    pub pet4d_json: Option<String>,
    /// Tumour mask, manual or automated.
    pub tumor_mri: Option<String>,
    /// Set when any role matched more than one file.
    pub need_revision: bool,
}

/// Configuration for a batch of patients, keyed by patient id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationArtifact {
    patients: BTreeMap<PatientId, PatientConfigEntry>,
}

impl ConfigurationArtifact {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: PatientId, entry: PatientConfigEntry) {
        self.patients.insert(id, entry);
    }

    pub fn get(&self, id: &PatientId) -> Option<&PatientConfigEntry> {
        self.patients.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PatientId, &PatientConfigEntry)> {
        self.patients.iter()
    }

    /// Patients flagged for manual review.
    pub fn needing_revision(&self) -> Vec<&PatientId> {
        self.patients
            .iter()
            .filter(|(_, entry)| entry.need_revision)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

/// Result of resolving one role: the chosen file and whether the choice was ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Resolved {
    first: Option<PathBuf>,
    ambiguous: bool,
}

/// Collects every match across the role's patterns and keeps the first.
fn resolve_role(workspace_root: &Path, catalog: &PatternCatalog, role: FileRole) -> Resolved {
    let matches: Vec<PathBuf> = catalog
        .patterns(role)
        .iter()
        .flat_map(|pattern| find_matches(workspace_root, pattern))
        .collect();

    if matches.len() > 1 {
        tracing::warn!(
            "{} matches for {} of {}; using {}",
            matches.len(),
            role,
            catalog.patient_id(),
            matches[0].display()
        );
    }

    Resolved {
        ambiguous: matches.len() > 1,
        first: matches.into_iter().next(),
    }
}

/// Derives the sidecar path of a dynamic PET file: same directory, name up to the first
/// `.`, extension `.json`. Returns it only if the file exists.
fn sidecar_for(pet4d: &Path) -> Option<PathBuf> {
    let name = pet4d.file_name()?.to_string_lossy();
    let stem = name.split('.').next().unwrap_or_default();
    let candidate = pet4d.with_file_name(format!("{stem}.{SIDECAR_EXTENSION}"));
    candidate.is_file().then_some(candidate)
}

/// Resolves all pipeline inputs for one patient.
pub fn assemble_patient(workspace_root: &Path, patient_id: &PatientId) -> PatientConfigEntry {
    let catalog = PatternCatalog::for_patient(patient_id);
    let relative = |path: Option<&PathBuf>| {
        path.and_then(|p| relative_posix(workspace_root, p))
    };

    let flair = resolve_role(workspace_root, &catalog, FileRole::Flair);
    let skull_stripped = resolve_role(workspace_root, &catalog, FileRole::SkullStripped);
    let pet_static = resolve_role(workspace_root, &catalog, FileRole::PetStatic);
    let pet_dynamic = resolve_role(workspace_root, &catalog, FileRole::PetDynamic);
    let tumor_mask = resolve_role(workspace_root, &catalog, FileRole::TumorMask);

    // The sidecar is only looked for next to the chosen dynamic PET file.
    let sidecar = pet_dynamic.first.as_deref().and_then(sidecar_for);

    let need_revision = [&flair, &skull_stripped, &pet_static, &pet_dynamic, &tumor_mask]
        .iter()
        .any(|resolved| resolved.ambiguous);

    PatientConfigEntry {
        mri: relative(flair.first.as_ref()),
        mri_str: relative(skull_stripped.first.as_ref()),
        pet: relative(pet_static.first.as_ref()),
        pet4d: relative(pet_dynamic.first.as_ref()),
        pet4d_json: relative(sidecar.as_ref()),
        tumor_mri: relative(tumor_mask.first.as_ref()),
        need_revision,
    }
}

/// Resolves all pipeline inputs for every patient in `patient_ids`.
///
/// Patients are independent of one another; the order of `patient_ids` does not matter.
pub fn assemble<'a>(
    workspace_root: &Path,
    patient_ids: impl IntoIterator<Item = &'a PatientId>,
) -> ConfigurationArtifact {
    let mut artifact = ConfigurationArtifact::new();
    for id in patient_ids {
        artifact.insert(id.clone(), assemble_patient(workspace_root, id));
    }
    artifact
}
