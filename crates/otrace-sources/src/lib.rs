//! otrace-sources — artifact sources for otrace.
//!
//! Each source produces an immutable [`otrace_core::Snapshot`] of the
//! artifact root. The pipeline in `otrace-core` never touches the filesystem
//! itself.

pub mod directory;
pub mod error;

pub use directory::{DirectoryLayout, DirectorySource};
pub use error::SourceError;

use otrace_core::{Snapshot, SnapshotSource};

/// A source that always returns the same prebuilt snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    snapshot: Snapshot,
}

impl StaticSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

impl SnapshotSource for StaticSource {
    async fn snapshot(&self) -> Snapshot {
        self.snapshot.clone()
    }
}
