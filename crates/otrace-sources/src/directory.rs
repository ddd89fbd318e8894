//! Directory source — snapshots the on-disk artifact root.
//!
//! Layout (all relative to the root):
//!
//! | Path | Contents |
//! |------|----------|
//! | `*.log` | line-oriented application logs |
//! | `Raw/Inbound/*.txt` | raw calls received by the integration |
//! | `Raw/Outbound/*.txt` | raw calls made to OTCS |
//! | `Raw/Maps/Map_*.txt` | map files |
//!
//! Listings are sorted by name so discovery order is deterministic. Log files
//! are read concurrently; raw and map artifacts are only listed.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use futures::future::join_all;
use otrace_core::config::AnalyzerConfig;
use otrace_core::{ArtifactFile, LogFile, Snapshot, SnapshotSource};

use crate::error::SourceError;

const ARTIFACT_EXTENSION: &str = "txt";

/// Where things live under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    pub log_extension: String,
    pub inbound_dir: String,
    pub outbound_dir: String,
    pub maps_dir: String,
}

impl Default for DirectoryLayout {
    fn default() -> Self {
        Self::from(&AnalyzerConfig::default())
    }
}

impl From<&AnalyzerConfig> for DirectoryLayout {
    fn from(cfg: &AnalyzerConfig) -> Self {
        Self {
            log_extension: cfg.log_extension.clone(),
            inbound_dir: cfg.inbound_dir.clone(),
            outbound_dir: cfg.outbound_dir.clone(),
            maps_dir: cfg.maps_dir.clone(),
        }
    }
}

/// Reads the artifact root from disk on every [`SnapshotSource::snapshot`].
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    layout: DirectoryLayout,
}

/// One listed file before it becomes a [`LogFile`] or [`ArtifactFile`].
#[derive(Debug)]
struct Listed {
    name: String,
    path: PathBuf,
    modified: Option<NaiveDateTime>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, layout: DirectoryLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        Self::new(cfg.root.clone(), DirectoryLayout::from(cfg))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn log_files(&self) -> Vec<LogFile> {
        let listed = recover(list(&self.root, &self.layout.log_extension).await);
        let reads = listed.into_iter().map(|file| async move {
            match tokio::fs::read(&file.path).await {
                Ok(bytes) => Some(LogFile {
                    name: file.name,
                    contents: String::from_utf8_lossy(&bytes).into_owned(),
                }),
                Err(source) => {
                    report(&SourceError::ReadFile {
                        path: file.path,
                        source,
                    });
                    None
                }
            }
        });
        join_all(reads).await.into_iter().flatten().collect()
    }

    async fn artifacts(&self, relative_dir: &str) -> Vec<ArtifactFile> {
        let relative_dir = relative_dir.trim_matches('/');
        let listed = recover(list(&self.root.join(relative_dir), ARTIFACT_EXTENSION).await);
        listed
            .into_iter()
            .map(|file| ArtifactFile {
                relative_path: format!("{relative_dir}/{}", file.name),
                name: file.name,
                modified: file.modified,
            })
            .collect()
    }
}

impl SnapshotSource for DirectorySource {
    async fn snapshot(&self) -> Snapshot {
        let (log_files, inbound, outbound, maps) = tokio::join!(
            self.log_files(),
            self.artifacts(&self.layout.inbound_dir),
            self.artifacts(&self.layout.outbound_dir),
            self.artifacts(&self.layout.maps_dir),
        );
        tracing::debug!(
            root = %self.root.display(),
            log_files = log_files.len(),
            inbound = inbound.len(),
            outbound = outbound.len(),
            maps = maps.len(),
            "directory: snapshot taken"
        );
        Snapshot {
            log_files,
            inbound,
            outbound,
            maps,
        }
    }
}

// ---------------------------------------------------------------------------
// Listing helpers
// ---------------------------------------------------------------------------

/// Regular files in `dir` (not recursive) whose extension matches, sorted by
/// name. Names that are not valid UTF-8 are skipped.
async fn list(dir: &Path, extension: &str) -> Result<Vec<Listed>, SourceError> {
    let list_err = |source| SourceError::ListDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(list_err)?;

    let mut files = Vec::new();
    while let Some(entry) = read_dir.next_entry().await.map_err(list_err)? {
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let matches_extension = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !matches_extension {
            continue;
        }
        let modified = metadata
            .modified()
            .ok()
            .map(|t| chrono::DateTime::<chrono::Local>::from(t).naive_local());
        files.push(Listed {
            name,
            path: entry.path(),
            modified,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

fn recover<T: Default>(result: Result<T, SourceError>) -> T {
    result.unwrap_or_else(|err| {
        report(&err);
        T::default()
    })
}

fn report(err: &SourceError) {
    if err.is_not_found() {
        tracing::debug!(error = %err, "directory: path missing, contributes nothing");
    } else {
        tracing::warn!(error = %err, "directory: skipped unreadable path");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
