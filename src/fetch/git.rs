//! Git-backed source fetching.

use std::path::Path;

use git2::build::RepoBuilder;
use git2::{Cred, CredentialType, DiffOptions, FetchOptions, Oid, RemoteCallbacks, Repository};

use super::{FetchedTree, SourceFetcher, UNKNOWN_REVISION};
use crate::error::{Result, SkillsError};

/// Credential callbacks give up after this many attempts.
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Clones remote sources into scratch directories.
///
/// An identity naming an existing local directory is used in place without
/// cloning, which makes working copies of a skills repository usable as
/// sources.
#[derive(Debug, Clone, Copy)]
pub struct GitFetcher {
    depth: u32,
}

impl GitFetcher {
    /// Fetcher cloning `depth` commits of history; `0` clones everything.
    #[must_use]
    pub const fn new(depth: u32) -> Self {
        Self { depth }
    }

    fn clone_into(&self, url: &str, dest: &Path) -> std::result::Result<(), git2::Error> {
        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(build_callbacks());
        if self.depth > 0 {
            fetch.depth(i32::try_from(self.depth).unwrap_or(i32::MAX));
        }

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch);
        builder.clone(url, dest)?;
        Ok(())
    }
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SourceFetcher for GitFetcher {
    fn fetch(&self, identity: &str) -> Result<FetchedTree> {
        let local = Path::new(identity);
        if local.is_dir() {
            tracing::debug!(path = %local.display(), "using local source tree in place");
            return Ok(FetchedTree::in_place(local));
        }

        let scratch = tempfile::Builder::new()
            .prefix("agent-skills-")
            .tempdir()?;
        tracing::info!(repo = identity, depth = self.depth, "cloning source");
        self.clone_into(identity, scratch.path())
            .map_err(|err| SkillsError::FetchFailed {
                identity: identity.to_string(),
                reason: format!(
                    "{}\nMake sure the URL is correct and you have access (SSH key / token).",
                    err.message()
                ),
            })?;
        Ok(FetchedTree::scratch(scratch))
    }

    fn tree_revision(&self, root: &Path) -> String {
        head_oid(root).map_or_else(|| UNKNOWN_REVISION.to_string(), |oid| oid.to_string())
    }

    fn path_revision(&self, root: &Path, paths: &[String]) -> String {
        match last_commit_touching(root, paths) {
            Ok(Some(oid)) => oid.to_string(),
            Ok(None) => UNKNOWN_REVISION.to_string(),
            Err(err) => {
                tracing::debug!(root = %root.display(), error = %err, "path revision unavailable");
                UNKNOWN_REVISION.to_string()
            }
        }
    }
}

fn build_callbacks() -> RemoteCallbacks<'static> {
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }
        if allowed.contains(CredentialType::SSH_KEY) {
            return Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            let config = git2::Config::open_default()?;
            return Cred::credential_helper(&config, url, username_from_url);
        }
        Cred::default()
    });
    callbacks
}

fn head_oid(root: &Path) -> Option<Oid> {
    Repository::open(root).ok()?.head().ok()?.target()
}

/// Walk history from HEAD, newest first, and return the first commit whose
/// diff against its parent touches any of `paths`.
///
/// A commit whose parent is unavailable (root or shallow boundary) is diffed
/// against the empty tree.
fn last_commit_touching(
    root: &Path,
    paths: &[String],
) -> std::result::Result<Option<Oid>, git2::Error> {
    let repo = Repository::open(root)?;
    let Ok(head) = repo.head() else {
        return Ok(None);
    };
    let Some(head_oid) = head.target() else {
        return Ok(None);
    };

    let mut revwalk = repo.revwalk()?;
    revwalk.push(head_oid)?;
    revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;

    for oid in revwalk {
        let oid = oid?;
        let commit = repo.find_commit(oid)?;
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };

        let mut opts = DiffOptions::new();
        for path in paths {
            opts.pathspec(path);
        }
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;
        if diff.deltas().len() > 0 {
            return Ok(Some(oid));
        }
    }

    Ok(None)
}
