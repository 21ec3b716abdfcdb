//! Workspace service.
//!
//! The entry points a front end calls: discovery, per-patient requirement checks, full
//! scans, and configuration builds. The service holds only the resolved
//! [`CoreConfig`]; every call re-reads the filesystem.

use crate::assembler::assemble;
use crate::discovery::discover_patients;
use crate::requirements::{resolve, RequirementStatus};
use crate::scan::{scan_workspace, WorkspaceStatus};
use crate::selection::PatientSelection;
use crate::writer::{list_configurations, write_configuration, ConfigFile};
use crate::{CoreConfig, CoreResult};
use bidsprep_types::PatientId;
use std::path::PathBuf;
use std::sync::Arc;

/// Pure workspace operations - no presentation concerns
#[derive(Clone, Debug)]
pub struct WorkspaceService {
    cfg: Arc<CoreConfig>,
}

impl WorkspaceService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Sorted ids of the patients in the workspace, one per id.
    pub fn discover_patients(&self) -> Vec<PatientId> {
        discover_patients(self.cfg.workspace_root())
    }

    /// Requirement status of `patient_id`, looked up at `<workspace>/<patient_id>`.
    pub fn check_requirements(&self, patient_id: &PatientId) -> RequirementStatus {
        resolve(self.cfg.workspace_root(), patient_id)
    }

    /// Status of every discovered patient.
    pub fn scan(&self) -> WorkspaceStatus {
        scan_workspace(self.cfg.workspace_root())
    }

    /// Assembles the configuration for the selected patients and writes it as the next
    /// numbered file.
    ///
    /// # Returns
    ///
    /// The path of the written configuration.
    ///
    /// # Errors
    ///
    /// Returns a `CoreError` if the pipeline directory or the file cannot be written.
    pub fn build_configuration(&self, selection: &PatientSelection) -> CoreResult<PathBuf> {
        let root = self.cfg.workspace_root();
        let artifact = assemble(root, selection.ids());
        let flagged = artifact.needing_revision();
        if !flagged.is_empty() {
            tracing::warn!(
                "{} of {} patients need revision: {:?}",
                flagged.len(),
                artifact.len(),
                flagged
            );
        }
        write_configuration(root, &artifact)
    }

    /// Configuration files written so far, oldest first.
    pub fn configurations(&self) -> Vec<ConfigFile> {
        list_configurations(self.cfg.workspace_root())
    }
}
