//! # bidsprep Core
//!
//! Eligibility resolution and configuration assembly for a BIDS-like imaging workspace.
//!
//! This crate decides, for every `sub-*` patient directory, whether the inputs a downstream
//! PET/MRI pipeline needs are present, and writes sequentially numbered configuration files
//! describing those inputs:
//! - Path catalog: where each file role lives ([`paths`])
//! - Requirement resolution and eligibility ([`requirements`], [`eligibility`])
//! - Patient discovery ([`discovery`]) and status scans ([`scan`])
//! - Configuration assembly ([`assembler`]) and versioned writing ([`writer`])
//!
//! Files are only checked for existence and name; image contents are never opened.
//!
//! **No presentation concerns**: layout, localisation and argument parsing belong to the
//! front end.

pub mod assembler;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod eligibility;
pub mod error;
pub mod matching;
pub mod paths;
pub mod requirements;
pub mod scan;
pub mod selection;
pub mod service;
pub mod writer;

pub use assembler::{assemble, ConfigurationArtifact, PatientConfigEntry};
pub use bidsprep_types::{PatientId, PatientIdError};
pub use config::CoreConfig;
pub use discovery::{discover, discover_patients, PatientCollision, PatientDir, PatientRegistry};
pub use error::{CoreError, CoreResult};
pub use paths::{FileRole, SegmentationType};
pub use requirements::{resolve, RequirementStatus};
pub use scan::{scan_workspace, PatientStatus, StatusSummary, WorkspaceStatus};
pub use selection::PatientSelection;
pub use service::WorkspaceService;
pub use writer::{load_configuration, write_configuration, ConfigFile};
