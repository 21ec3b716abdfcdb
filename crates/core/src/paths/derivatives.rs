//! Derivative data directories.
//!
//! Files produced by upstream processing are keyed by patient id beneath a
//! per-process subdirectory:
//! ```text
//! derivatives/
//!     skullstrips/<patient_id>/anat/*_brain.nii[.gz]
//!     manual_masks/<patient_id>/anat/*_mask.nii[.gz]
//!     deep_learning_seg/<patient_id>/anat/*_seg.nii[.gz]
//! ```

/// Top-level derivatives directory, relative to the workspace root.
#[derive(Debug, Clone, Copy)]
pub struct DerivativesDir;

impl DerivativesDir {
    pub const NAME: &'static str = "derivatives";
}

/// Skull-stripped anatomical images.
#[derive(Debug, Clone, Copy)]
pub struct SkullstripsDir;

impl SkullstripsDir {
    pub const NAME: &'static str = "skullstrips";
}

/// Manually drawn tumour masks.
#[derive(Debug, Clone, Copy)]
pub struct ManualMasksDir;

impl ManualMasksDir {
    pub const NAME: &'static str = "manual_masks";
}

/// Automated segmentation output.
#[derive(Debug, Clone, Copy)]
pub struct DeepLearningSegDir;

impl DeepLearningSegDir {
    pub const NAME: &'static str = "deep_learning_seg";
}
