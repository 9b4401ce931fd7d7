use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::{Result, SkillsError};
use crate::fetch::{FetchedTree, SourceFetcher, UNKNOWN_REVISION};
use crate::utils::fs::copy_dir_recursive;

/// In-memory stand-in for a remote fetcher.
///
/// Each fetch copies a registered template directory into a fresh scratch
/// directory and records it, so tests can assert that every fetched tree was
/// cleaned up.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    sources: BTreeMap<String, PathBuf>,
    revisions: BTreeMap<String, String>,
    failing: BTreeSet<String>,
    fetched: RefCell<Vec<(String, PathBuf)>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `template` for `identity`.
    pub fn source(mut self, identity: &str, template: &Path) -> Self {
        self.sources.insert(identity.to_string(), template.to_path_buf());
        self
    }

    /// Report `marker` as both tree and path revision for `identity`.
    pub fn revision(mut self, identity: &str, marker: &str) -> Self {
        self.revisions.insert(identity.to_string(), marker.to_string());
        self
    }

    /// Make every fetch of `identity` fail.
    pub fn failing(mut self, identity: &str) -> Self {
        self.failing.insert(identity.to_string());
        self
    }

    /// Scratch roots handed out so far, in fetch order.
    pub fn fetched_roots(&self) -> Vec<PathBuf> {
        self.fetched.borrow().iter().map(|(_, root)| root.clone()).collect()
    }

    /// Identities fetched so far, in fetch order.
    pub fn fetched_identities(&self) -> Vec<String> {
        self.fetched.borrow().iter().map(|(id, _)| id.clone()).collect()
    }

    fn marker_for(&self, root: &Path) -> String {
        self.fetched
            .borrow()
            .iter()
            .find(|(_, fetched)| fetched == root)
            .and_then(|(identity, _)| self.revisions.get(identity).cloned())
            .unwrap_or_else(|| UNKNOWN_REVISION.to_string())
    }
}

impl SourceFetcher for FakeFetcher {
    fn fetch(&self, identity: &str) -> Result<FetchedTree> {
        if self.failing.contains(identity) {
            return Err(SkillsError::FetchFailed {
                identity: identity.to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        let template = self
            .sources
            .get(identity)
            .ok_or_else(|| SkillsError::FetchFailed {
                identity: identity.to_string(),
                reason: "no such source".to_string(),
            })?;

        let scratch = tempfile::Builder::new()
            .prefix("agent-skills-fake-")
            .tempdir()?;
        copy_dir_recursive(template, scratch.path())?;
        println!("[FAKE FETCH] {identity} -> {:?}", scratch.path());
        self.fetched
            .borrow_mut()
            .push((identity.to_string(), scratch.path().to_path_buf()));
        Ok(FetchedTree::scratch(scratch))
    }

    fn tree_revision(&self, root: &Path) -> String {
        self.marker_for(root)
    }

    fn path_revision(&self, root: &Path, _paths: &[String]) -> String {
        self.marker_for(root)
    }
}
