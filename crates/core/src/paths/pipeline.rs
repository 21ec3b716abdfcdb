//! Pipeline output paths.
//!
//! Configuration artifacts are written as `pipeline/NN_config.json`, where `NN` is a
//! sequence number zero-padded to two digits (wider numbers are written as-is).

use crate::constants::CONFIG_FILE_SUFFIX;

/// Pipeline output directory, relative to the workspace root.
#[derive(Debug, Clone, Copy)]
pub struct PipelineDir;

impl PipelineDir {
    pub const NAME: &'static str = "pipeline";
}

/// Filename of a sequentially numbered configuration artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConfigFileName {
    sequence: u64,
}

impl ConfigFileName {
    pub fn new(sequence: u64) -> Self {
        Self { sequence }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Parses the sequence number out of an existing filename.
    ///
    /// The sequence is the token before the first underscore. Returns `None` when
    /// that token is not an unsigned integer or the name does not end in
    /// `_config.json`.
    pub fn parse(file_name: &str) -> Option<Self> {
        if !file_name.ends_with(CONFIG_FILE_SUFFIX) {
            return None;
        }
        let prefix = file_name.split('_').next()?;
        prefix.parse::<u64>().ok().map(Self::new)
    }

    pub fn file_name(&self) -> String {
        format!("{:02}{}", self.sequence, CONFIG_FILE_SUFFIX)
    }
}

impl std::fmt::Display for ConfigFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file_name())
    }
}
