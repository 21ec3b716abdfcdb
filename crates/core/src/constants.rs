//! Constants used throughout the bidsprep core crate.
//!
//! Directory and file names that are not part of a patient's on-disk layout live
//! here; the layout itself is typed in [`crate::paths`].

/// Directory names that are never descended into while discovering patients.
///
/// Both hold derived or output data rather than raw patient directories.
pub const EXCLUDED_DIR_NAMES: &[&str] = &[
    crate::paths::DerivativesDir::NAME,
    crate::paths::PipelineDir::NAME,
];

/// Suffix shared by every persisted pipeline configuration file.
pub const CONFIG_FILE_SUFFIX: &str = "_config.json";

/// Glob used to list existing pipeline configuration files.
pub const CONFIG_FILE_GLOB: &str = "*_config.json";

/// Indentation used when serialising pipeline configuration files.
pub const CONFIG_JSON_INDENT: &[u8] = b"    ";

/// Extension of the metadata sidecar that accompanies a dynamic PET image.
pub const SIDECAR_EXTENSION: &str = "json";

/// Number of attempts made to claim a fresh configuration filename.
pub const MAX_WRITE_ATTEMPTS: usize = 5;
