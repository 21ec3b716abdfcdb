#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid workspace root (path: {path}): {source}", path = path.display())]
    InvalidWorkspaceRoot {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create pipeline directory: {0}")]
    PipelineDirCreation(std::io::Error),
    #[error("failed to read pipeline directory: {0}")]
    PipelineDirRead(std::io::Error),
    #[error("failed to write configuration file: {0}")]
    ConfigWrite(std::io::Error),
    #[error("failed to read configuration file: {0}")]
    ConfigRead(std::io::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize configuration: {0}")]
    Deserialization(serde_json::Error),
    #[error("configuration sequence numbers exhausted in {0}")]
    SequenceExhausted(std::path::PathBuf),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
