//! Raw patient data directories.
//!
//! Raw imaging data lives directly under the patient directory:
//! ```text
//! sub-01/
//!     anat/            # structural MRI (FLAIR)
//!     ses-01/pet/      # static PET
//!     ses-02/pet/      # dynamic (4D) PET and its JSON sidecar
//! ```

/// Anatomical imaging subdirectory.
#[derive(Debug, Clone, Copy)]
pub struct AnatDir;

impl AnatDir {
    pub const NAME: &'static str = "anat";
}

/// Session holding the static PET acquisition.
#[derive(Debug, Clone, Copy)]
pub struct StaticPetSessionDir;

impl StaticPetSessionDir {
    pub const NAME: &'static str = "ses-01";
}

/// Session holding the dynamic PET acquisition.
#[derive(Debug, Clone, Copy)]
pub struct DynamicPetSessionDir;

impl DynamicPetSessionDir {
    pub const NAME: &'static str = "ses-02";
}

/// PET modality subdirectory within a session.
#[derive(Debug, Clone, Copy)]
pub struct PetDir;

impl PetDir {
    pub const NAME: &'static str = "pet";
}
