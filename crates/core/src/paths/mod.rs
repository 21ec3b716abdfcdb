//! On-disk path definitions for a BIDS-like imaging workspace.
//!
//! This module defines the relative filesystem layout of raw patient data, upstream
//! derivatives and pipeline outputs, plus the catalog of file patterns each
//! [`FileRole`] is looked up by. It contains **no I/O logic** - only typed path and
//! pattern construction.

pub mod catalog;
pub mod derivatives;
pub mod pipeline;
pub mod raw;

pub use catalog::{FileRole, PathPattern, PatternCatalog, SegmentationType};
pub use derivatives::{DeepLearningSegDir, DerivativesDir, ManualMasksDir, SkullstripsDir};
pub use pipeline::{ConfigFileName, PipelineDir};
pub use raw::{AnatDir, DynamicPetSessionDir, PetDir, StaticPetSessionDir};
