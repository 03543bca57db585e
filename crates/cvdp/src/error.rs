use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CvdpError {
    #[error("No JSONL files found in {}", .0.display())]
    NoInputFiles(PathBuf),

    #[error("Unsupported dataset filename: {0}")]
    UnsupportedDatasetFilename(String),

    #[error("Malformed JSON in {file}:{line} -> {reason}")]
    MalformedInput {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("Missing id in {file}:{line}")]
    MissingIdentifier { file: String, line: usize },

    #[error("Duplicate id: {0}")]
    DuplicateIdentifier(String),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CvdpError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, CvdpError>;
