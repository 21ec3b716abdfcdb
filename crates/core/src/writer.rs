//! Versioned configuration files.
//!
//! Every write creates `pipeline/NN_config.json` with `NN` one greater than the highest
//! sequence already present, so earlier runs are never overwritten. Files whose prefix
//! does not parse are ignored when numbering.
//!
//! Numbering is a read-then-write over the pipeline directory. Writers in this process
//! are serialised through a lock, and the file itself is created with create-new
//! semantics so a name claimed by anyone else is skipped rather than clobbered.

use crate::assembler::ConfigurationArtifact;
use crate::constants::{CONFIG_FILE_GLOB, CONFIG_JSON_INDENT, MAX_WRITE_ATTEMPTS};
use crate::matching::{compile, try_list_matching};
use crate::paths::{ConfigFileName, PipelineDir};
use crate::{CoreError, CoreResult};
use serde::Serialize;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

static WRITE_LOCK: Mutex<()> = Mutex::new(());

/// An existing configuration file and its parsed sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub sequence: u64,
    pub path: PathBuf,
}

/// Lists the configuration files in `pipeline_dir` whose prefix parses, sorted by sequence.
///
/// A missing or unreadable directory has no configuration files.
pub fn list_config_files(pipeline_dir: &Path) -> Vec<ConfigFile> {
    read_config_files(pipeline_dir).unwrap_or_else(|e| {
        tracing::warn!("{}", e);
        Vec::new()
    })
}

/// Strict form of [`list_config_files`]: only a missing directory counts as empty.
fn read_config_files(pipeline_dir: &Path) -> CoreResult<Vec<ConfigFile>> {
    let matcher = match compile(CONFIG_FILE_GLOB) {
        Ok(matcher) => matcher,
        Err(e) => {
            tracing::warn!("invalid glob {}: {}", CONFIG_FILE_GLOB, e);
            return Ok(Vec::new());
        }
    };

    let paths = match try_list_matching(pipeline_dir, &matcher) {
        Ok(paths) => paths,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(CoreError::PipelineDirRead(e)),
    };

    let mut files: Vec<ConfigFile> = paths
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            match ConfigFileName::parse(&name) {
                Some(parsed) => Some(ConfigFile {
                    sequence: parsed.sequence(),
                    path,
                }),
                None => {
                    tracing::debug!("ignoring config file with malformed sequence: {}", name);
                    None
                }
            }
        })
        .collect();

    files.sort_by(|a, b| a.sequence.cmp(&b.sequence).then_with(|| a.path.cmp(&b.path)));
    Ok(files)
}

/// Next sequence number for `pipeline_dir`: one more than the highest parsed prefix,
/// or 1 when nothing parses.
///
/// # Errors
///
/// Returns `CoreError::PipelineDirRead` if the directory exists but cannot be listed, and
/// `CoreError::SequenceExhausted` if the highest prefix is `u64::MAX`.
pub fn next_sequence_number(pipeline_dir: &Path) -> CoreResult<u64> {
    match read_config_files(pipeline_dir)?
        .iter()
        .map(|f| f.sequence)
        .max()
    {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| CoreError::SequenceExhausted(pipeline_dir.to_path_buf())),
    }
}

/// Serialises an artifact as 4-space indented JSON.
///
/// Patients are ordered by id and fields by declaration, so the same artifact always
/// produces the same bytes.
pub fn to_json_bytes(artifact: &ConfigurationArtifact) -> CoreResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(CONFIG_JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    artifact
        .serialize(&mut serializer)
        .map_err(CoreError::Serialization)?;
    Ok(buffer)
}

/// Writes `artifact` as the next numbered configuration under `<workspace_root>/pipeline`.
///
/// The pipeline directory is created if needed. The artifact is fully serialised before
/// any file is created.
///
/// # Returns
///
/// The path of the new configuration file.
///
/// # Errors
///
/// Returns a `CoreError` if:
/// - the pipeline directory cannot be created,
/// - serialisation fails,
/// - the file cannot be created or written (a partially written file is removed),
/// - no free sequence number is found after a bounded number of attempts.
pub fn write_configuration(
    workspace_root: &Path,
    artifact: &ConfigurationArtifact,
) -> CoreResult<PathBuf> {
    let bytes = to_json_bytes(artifact)?;
    let pipeline_dir = workspace_root.join(PipelineDir::NAME);

    let _guard = WRITE_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    if !pipeline_dir.is_dir() {
        fs::create_dir_all(&pipeline_dir).map_err(CoreError::PipelineDirCreation)?;
        tracing::info!("Created pipeline directory: {}", pipeline_dir.display());
    }

    let mut sequence = next_sequence_number(&pipeline_dir)?;
    for _attempt in 0..MAX_WRITE_ATTEMPTS {
        let output_path = pipeline_dir.join(ConfigFileName::new(sequence).file_name());

        match create_and_write(&output_path, &bytes) {
            Ok(()) => {
                tracing::info!("Pipeline configuration saved to: {}", output_path.display());
                return Ok(output_path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::warn!(
                    "configuration {} appeared while writing; trying the next number",
                    output_path.display()
                );
                sequence = sequence
                    .checked_add(1)
                    .ok_or_else(|| CoreError::SequenceExhausted(pipeline_dir.clone()))?;
            }
            Err(e) => return Err(CoreError::ConfigWrite(e)),
        }
    }

    Err(CoreError::ConfigWrite(io::Error::new(
        ErrorKind::AlreadyExists,
        format!(
            "failed to claim a configuration filename after {} attempts",
            MAX_WRITE_ATTEMPTS
        ),
    )))
}

fn create_and_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;

    if let Err(e) = file.write_all(bytes).and_then(|()| file.sync_all()) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            tracing::warn!(
                "failed to remove partial configuration {}: {}",
                path.display(),
                cleanup
            );
        }
        return Err(e);
    }

    Ok(())
}

/// Reads a configuration file written by [`write_configuration`].
pub fn load_configuration(path: &Path) -> CoreResult<ConfigurationArtifact> {
    let contents = fs::read(path).map_err(CoreError::ConfigRead)?;
    serde_json::from_slice(&contents).map_err(CoreError::Deserialization)
}

/// Lists the configuration files written under `<workspace_root>/pipeline`.
pub fn list_configurations(workspace_root: &Path) -> Vec<ConfigFile> {
    list_config_files(&workspace_root.join(PipelineDir::NAME))
}
