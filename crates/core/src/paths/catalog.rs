//! Path pattern catalog.
//!
//! Maps each [`FileRole`] to the ordered list of glob patterns it is looked up by.
//! Patterns are split into a literal directory (relative to the workspace root) and a
//! filename glob, so evaluating one never needs more than a single directory listing.
//!
//! The catalog is pure data: it performs no I/O.

use super::derivatives::{DeepLearningSegDir, DerivativesDir, ManualMasksDir, SkullstripsDir};
use super::raw::{AnatDir, DynamicPetSessionDir, PetDir, StaticPetSessionDir};
use bidsprep_types::PatientId;
use std::path::{Path, PathBuf};

/// NIfTI extensions accepted for every imaging role, in lookup order.
const NIFTI_EXTENSIONS: [&str; 2] = [".nii", ".nii.gz"];

/// A kind of input file the downstream pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileRole {
    Flair,
    SkullStripped,
    Segmentation,
    PetStatic,
    PetDynamic,
    PetDynamicSidecar,
    TumorMask,
}

impl FileRole {
    /// Roles a patient must have to be eligible, in display order.
    pub const REQUIRED: [FileRole; 3] = [
        FileRole::Flair,
        FileRole::SkullStripped,
        FileRole::Segmentation,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flair => "flair",
            Self::SkullStripped => "skull_stripped",
            Self::Segmentation => "segmentation",
            Self::PetStatic => "pet_static",
            Self::PetDynamic => "pet_dynamic",
            Self::PetDynamicSidecar => "pet_dynamic_sidecar",
            Self::TumorMask => "tumor_mask",
        }
    }
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a segmentation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationType {
    /// `derivatives/manual_masks/...`
    Manual,
    /// `derivatives/deep_learning_seg/...`
    Derived,
}

impl SegmentationType {
    /// Human-readable label for status displays.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "Manual Mask",
            Self::Derived => "Deep Learning Segmentation",
        }
    }
}

/// One candidate location for a role: a literal directory plus a filename glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    dir: PathBuf,
    file_glob: String,
    segmentation_type: Option<SegmentationType>,
}

impl PathPattern {
    fn new(dir: PathBuf, file_glob: String) -> Self {
        Self {
            dir,
            file_glob,
            segmentation_type: None,
        }
    }

    fn with_segmentation_type(mut self, segmentation_type: SegmentationType) -> Self {
        self.segmentation_type = Some(segmentation_type);
        self
    }

    /// Directory to list, relative to the workspace root.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Glob matched against file names inside [`Self::dir`].
    pub fn file_glob(&self) -> &str {
        &self.file_glob
    }

    /// Segmentation source this pattern belongs to, for segmentation-like roles.
    pub fn segmentation_type(&self) -> Option<SegmentationType> {
        self.segmentation_type
    }

    /// Renders the full pattern string under `workspace_root`.
    pub fn render(&self, workspace_root: &Path) -> String {
        workspace_root
            .join(&self.dir)
            .join(&self.file_glob)
            .to_string_lossy()
            .into_owned()
    }
}

/// Pattern catalog for a single patient.
///
/// `raw_dir` is the patient's raw data directory relative to the workspace root.
/// For a top-level patient that is just the id; a patient discovered at a nested
/// location keeps its actual relative path while derivatives stay keyed by id.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    patient_id: PatientId,
    raw_dir: PathBuf,
}

impl PatternCatalog {
    /// Catalog for a patient whose raw directory is `<root>/<patient_id>`.
    pub fn for_patient(patient_id: &PatientId) -> Self {
        Self {
            patient_id: patient_id.clone(),
            raw_dir: PathBuf::from(patient_id.as_str()),
        }
    }

    /// Catalog for a patient whose raw directory lives at `raw_dir` (relative to the root).
    pub fn at(patient_id: &PatientId, raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            patient_id: patient_id.clone(),
            raw_dir: raw_dir.into(),
        }
    }

    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    /// Ordered candidate patterns for `role`.
    ///
    /// [`FileRole::PetDynamicSidecar`] has no patterns: its filename is derived from the
    /// resolved dynamic PET file.
    pub fn patterns(&self, role: FileRole) -> Vec<PathPattern> {
        match role {
            FileRole::Flair => nifti(self.raw_dir.join(AnatDir::NAME), "_flair"),
            FileRole::SkullStripped => nifti(self.derivative_anat(SkullstripsDir::NAME), "_brain"),
            FileRole::Segmentation | FileRole::TumorMask => {
                let mut patterns: Vec<PathPattern> =
                    nifti(self.derivative_anat(ManualMasksDir::NAME), "_mask")
                        .into_iter()
                        .map(|p| p.with_segmentation_type(SegmentationType::Manual))
                        .collect();
                patterns.extend(
                    nifti(self.derivative_anat(DeepLearningSegDir::NAME), "_seg")
                        .into_iter()
                        .map(|p| p.with_segmentation_type(SegmentationType::Derived)),
                );
                patterns
            }
            FileRole::PetStatic => nifti(
                self.raw_dir
                    .join(StaticPetSessionDir::NAME)
                    .join(PetDir::NAME),
                "_pet",
            ),
            FileRole::PetDynamic => nifti(
                self.raw_dir
                    .join(DynamicPetSessionDir::NAME)
                    .join(PetDir::NAME),
                "_pet",
            ),
            FileRole::PetDynamicSidecar => Vec::new(),
        }
    }

    fn derivative_anat(&self, subtype: &str) -> PathBuf {
        PathBuf::from(DerivativesDir::NAME)
            .join(subtype)
            .join(self.patient_id.as_str())
            .join(AnatDir::NAME)
    }
}

fn nifti(dir: PathBuf, suffix: &str) -> Vec<PathPattern> {
    NIFTI_EXTENSIONS
        .iter()
        .map(|ext| PathPattern::new(dir.clone(), format!("*{suffix}{ext}")))
        .collect()
}
