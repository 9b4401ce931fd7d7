//! Source tree retrieval.
//!
//! The core never talks to a version control system directly. It asks a
//! [`SourceFetcher`] for a local copy of each configured source and for opaque
//! revision markers, and drops the returned [`FetchedTree`] when done.

mod git;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

pub use git::GitFetcher;

/// Marker reported when no revision can be determined.
///
/// A ledger entry carrying this marker is never considered up to date.
pub const UNKNOWN_REVISION: &str = "unknown";

/// Materializes source trees and reports their revisions.
pub trait SourceFetcher {
    /// Obtain a read-only local copy of the source named by `identity`.
    ///
    /// Fails with [`crate::SkillsError::FetchFailed`] naming the identity.
    fn fetch(&self, identity: &str) -> Result<FetchedTree>;

    /// Revision of the whole tree at `root`, or [`UNKNOWN_REVISION`].
    fn tree_revision(&self, root: &Path) -> String;

    /// Most recent revision that touched any of `paths` (relative to `root`),
    /// or [`UNKNOWN_REVISION`].
    fn path_revision(&self, root: &Path, paths: &[String]) -> String;
}

/// A local source tree, deleted on drop when it was fetched into scratch space.
#[derive(Debug)]
pub struct FetchedTree {
    root: PathBuf,
    scratch: Option<TempDir>,
}

impl FetchedTree {
    /// Tree living in a scratch directory owned by this value.
    #[must_use]
    pub fn scratch(dir: TempDir) -> Self {
        Self {
            root: dir.path().to_path_buf(),
            scratch: Some(dir),
        }
    }

    /// Tree used where it already is; never deleted.
    #[must_use]
    pub fn in_place(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scratch: None,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn is_scratch(&self) -> bool {
        self.scratch.is_some()
    }
}

impl Drop for FetchedTree {
    fn drop(&mut self) {
        let Some(dir) = self.scratch.take() else {
            return;
        };
        let path = dir.path().to_path_buf();
        match dir.close() {
            Ok(()) => tracing::debug!(path = %path.display(), "removed fetched tree"),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to remove fetched tree");
            }
        }
    }
}
