//! Requirement resolution.
//!
//! Probes the filesystem for the three required roles of a patient and folds the result
//! through the eligibility classifier. Every probe is read-only; nothing here fails.
//! An unreadable workspace simply reports every role as absent, so callers that need to
//! tell "no files" from "bad root" validate the root first (see [`crate::CoreConfig::new`]).

use crate::eligibility::{is_eligible, missing_items};
use crate::matching::find_matches;
use crate::paths::{FileRole, PatternCatalog, SegmentationType};
use bidsprep_types::PatientId;
use std::collections::BTreeMap;
use std::path::Path;

/// Eligibility status of one patient, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementStatus {
    /// Presence of each required role.
    pub requirements: BTreeMap<FileRole, bool>,
    /// `true` iff every required role is present.
    pub eligible: bool,
    /// Descriptions of the missing required roles, in catalog order.
    pub missing_files: Vec<&'static str>,
    /// Which source the segmentation came from, when it was found.
    pub segmentation_type: Option<SegmentationType>,
}

impl RequirementStatus {
    pub fn is_present(&self, role: FileRole) -> bool {
        self.requirements.get(&role).copied().unwrap_or(false)
    }
}

/// Outcome of probing a single role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RoleProbe {
    present: bool,
    segmentation_type: Option<SegmentationType>,
}

/// Resolves the required roles for a patient whose raw directory is `<root>/<patient_id>`.
pub fn resolve(workspace_root: &Path, patient_id: &PatientId) -> RequirementStatus {
    resolve_with(workspace_root, &PatternCatalog::for_patient(patient_id))
}

/// Resolves the required roles using an explicit pattern catalog.
///
/// Used for patients discovered at nested locations, whose raw data is not directly
/// under the workspace root.
pub fn resolve_with(workspace_root: &Path, catalog: &PatternCatalog) -> RequirementStatus {
    let mut requirements = BTreeMap::new();
    let mut segmentation_type = None;

    for role in FileRole::REQUIRED {
        let probe = probe_role(workspace_root, catalog, role);
        if role == FileRole::Segmentation {
            segmentation_type = probe.segmentation_type;
        }
        requirements.insert(role, probe.present);
    }

    tracing::debug!(
        "resolved requirements for {}: {:?}",
        catalog.patient_id(),
        requirements
    );

    RequirementStatus {
        eligible: is_eligible(&requirements),
        missing_files: missing_items(&requirements),
        requirements,
        segmentation_type,
    }
}

/// A role is present once any of its patterns yields a match. Later patterns are not
/// evaluated, which is what gives manual masks precedence over automated segmentations.
fn probe_role(workspace_root: &Path, catalog: &PatternCatalog, role: FileRole) -> RoleProbe {
    for pattern in catalog.patterns(role) {
        let matches = find_matches(workspace_root, &pattern);
        tracing::debug!(
            "{} matches for {}",
            matches.len(),
            pattern.render(workspace_root)
        );
        if !matches.is_empty() {
            return RoleProbe {
                present: true,
                segmentation_type: pattern.segmentation_type(),
            };
        }
    }

    RoleProbe {
        present: false,
        segmentation_type: None,
    }
}
