//! Errors raised while reading the artifact root.
//!
//! None of these reach a caller of [`crate::DirectorySource`]: each one is
//! logged and the offending file or directory contributes nothing.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// A directory could not be listed.
    #[error("failed to list {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A log file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// A missing directory is routine (nothing was captured yet); everything
    /// else deserves a warning.
    pub fn is_not_found(&self) -> bool {
        match self {
            SourceError::ListDir { source, .. } | SourceError::ReadFile { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
        }
    }
}
