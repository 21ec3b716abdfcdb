//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Core code never reads environment variables; the binary decides
//! where the workspace lives and hands the result over as a [`CoreConfig`].

use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    workspace_root: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig` for the workspace at `workspace_root`.
    ///
    /// The resolvers treat an unreadable root as "no files"; this constructor is where a
    /// caller that wants a hard failure validates the root first.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidWorkspaceRoot` if the path does not exist, cannot be
    /// canonicalised, or is not a directory.
    pub fn new(workspace_root: impl AsRef<Path>) -> CoreResult<Self> {
        let path = workspace_root.as_ref();

        let canonical = path
            .canonicalize()
            .map_err(|source| CoreError::InvalidWorkspaceRoot {
                path: path.to_path_buf(),
                source,
            })?;

        if !canonical.is_dir() {
            return Err(CoreError::InvalidWorkspaceRoot {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "workspace root is not a directory",
                ),
            });
        }

        Ok(Self {
            workspace_root: canonical,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_core_config_accepts_directory() {
        let temp = TempDir::new().unwrap();
        let cfg = CoreConfig::new(temp.path()).unwrap();

        assert_eq!(cfg.workspace_root(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_core_config_rejects_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = CoreConfig::new(temp.path().join("does-not-exist"));

        assert!(matches!(
            result,
            Err(CoreError::InvalidWorkspaceRoot { .. })
        ));
    }

    #[test]
    fn test_core_config_rejects_file_root() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("workspace.txt");
        fs::write(&file, "not a directory").unwrap();

        let result = CoreConfig::new(&file);

        assert!(matches!(
            result,
            Err(CoreError::InvalidWorkspaceRoot { .. })
        ));
    }
}
