//! Aggregation of skills across every configured source.

use std::path::{Path, PathBuf};

use crate::core::references::{AvailableReferences, scan_available_references};
use crate::core::scan::{SKILLS_DIR, SkillCandidate, scan_source_tree};
use crate::error::{Result, SkillsError};
use crate::fetch::{FetchedTree, SourceFetcher};

/// Fetched source trees and the skills found in them.
///
/// Candidates keep source-list order and are never de-duplicated by name, so
/// lookups return the first match in that order. Every fetched tree is
/// released when the set is dropped, on success and failure alike.
#[derive(Debug, Default)]
pub struct SourceSet {
    candidates: Vec<SkillCandidate>,
    trees: Vec<(String, FetchedTree)>,
}

impl SourceSet {
    /// Fetch and scan each identity in order.
    ///
    /// A repeated identity is fetched once. If any fetch fails, the trees
    /// fetched so far are released before the error is returned.
    pub fn fetch_all<F>(fetcher: &F, identities: &[String]) -> Result<Self>
    where
        F: SourceFetcher + ?Sized,
    {
        let mut set = Self::default();
        for identity in identities {
            if set.tree_for(identity).is_some() {
                tracing::debug!(repo = %identity, "source already fetched");
                continue;
            }
            tracing::info!(repo = %identity, "fetching skills");
            let tree = fetcher.fetch(identity)?;
            let skills = scan_source_tree(tree.root(), identity);
            set.trees.push((identity.clone(), tree));
            set.candidates.extend(skills?);
        }
        Ok(set)
    }

    #[must_use]
    pub fn candidates(&self) -> &[SkillCandidate] {
        &self.candidates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Local root of the tree fetched for `identity`.
    #[must_use]
    pub fn tree_for(&self, identity: &str) -> Option<&Path> {
        self.trees
            .iter()
            .find(|(id, _)| id == identity)
            .map(|(_, tree)| tree.root())
    }

    pub fn tree_roots(&self) -> impl Iterator<Item = &Path> {
        self.trees.iter().map(|(_, tree)| tree.root())
    }

    /// Source directory of `candidate` inside its fetched tree.
    #[must_use]
    pub fn skill_dir(&self, candidate: &SkillCandidate) -> Option<PathBuf> {
        self.tree_for(&candidate.repo)
            .map(|root| root.join(SKILLS_DIR).join(&candidate.dir_name))
    }

    /// First candidate whose directory name or manifest name equals `query`.
    #[must_use]
    pub fn find(&self, query: &str) -> Option<&SkillCandidate> {
        self.candidates
            .iter()
            .find(|skill| skill.dir_name == query || skill.name == query)
    }

    /// Resolve every query, failing on the first unknown one.
    pub fn resolve(&self, queries: &[String]) -> Result<Vec<&SkillCandidate>> {
        queries
            .iter()
            .map(|query| {
                self.find(query).ok_or_else(|| SkillsError::SkillNotFound {
                    name: query.clone(),
                    available: self.available_names(),
                })
            })
            .collect()
    }

    /// Directory names of every candidate, in aggregation order.
    #[must_use]
    pub fn available_names(&self) -> Vec<String> {
        self.candidates.iter().map(|s| s.dir_name.clone()).collect()
    }

    /// Candidates whose name, description, or directory name contains
    /// `keyword`, ignoring case.
    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<&SkillCandidate> {
        let needle = keyword.to_lowercase();
        self.candidates
            .iter()
            .filter(|skill| {
                skill.name.to_lowercase().contains(&needle)
                    || skill.description.to_lowercase().contains(&needle)
                    || skill.dir_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Optional reference topics offered across all fetched trees.
    pub fn available_references(&self) -> Result<AvailableReferences> {
        scan_available_references(self.tree_roots())
    }
}
