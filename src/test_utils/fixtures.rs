use std::path::{Path, PathBuf};

use git2::{IndexAddOption, Repository, Signature, Time};
use tempfile::TempDir;

/// Builder for an on-disk directory tree used as a source tree, a target
/// directory, or a project root in tests.
pub struct SourceTreeFixture {
    temp_dir: TempDir,
}

impl SourceTreeFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        println!("[FIXTURE] Created temp directory: {:?}", temp_dir.path());
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative_path: &str) -> PathBuf {
        self.root().join(relative_path)
    }

    /// Identity string under which this tree can be used as a source.
    pub fn identity(&self) -> String {
        self.root().display().to_string()
    }

    /// Write a file, creating parent directories.
    pub fn file(self, relative_path: &str, content: &str) -> Self {
        self.write(relative_path, content);
        self
    }

    /// Write `skills/<dir_name>/SKILL.md`.
    pub fn skill(self, dir_name: &str, manifest: &str) -> Self {
        self.file(&format!("skills/{dir_name}/SKILL.md"), manifest)
    }

    pub fn write(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.path(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Turn the tree into a git repository.
    pub fn init_git(self) -> Self {
        Repository::init(self.root()).expect("Failed to init repository");
        self
    }

    /// Commit every file in the tree and return the new commit id.
    ///
    /// Commit times strictly increase so history order is unambiguous.
    pub fn commit_all(&self, message: &str) -> String {
        let repo = Repository::open(self.root()).expect("Failed to open repository");
        let mut index = repo.index().expect("Failed to open index");
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .expect("Failed to stage files");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let now = chrono::Utc::now().timestamp();
        let seconds = parent
            .as_ref()
            .map_or(now, |commit| now.max(commit.time().seconds() + 1));
        let signature = Signature::new("Skills Tests", "tests@example.com", &Time::new(seconds, 0))
            .expect("Failed to build signature");

        let parents: Vec<_> = parent.iter().collect();
        let oid = repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .expect("Failed to commit");
        println!("[FIXTURE] Committed {oid}: {message}");
        oid.to_string()
    }
}

impl Default for SourceTreeFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SourceTreeFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.root());
    }
}

/// Manifest text with the given name and description.
pub fn manifest(name: &str, description: &str) -> String {
    format!("---\nname: {name}\ndescription: {description}\n---\n\n# {name}\n")
}

/// Manifest text whose body points into the shared references tree.
pub fn manifest_with_references(name: &str, description: &str) -> String {
    format!(
        "---\nname: {name}\ndescription: {description}\n---\n\n# {name}\n\nFollow references/general/style.md.\n"
    )
}

/// A source tree carrying the full reference layout: core topics, a `vcs`
/// topic with two review-posting guides, and two optional techs.
pub fn source_with_references() -> SourceTreeFixture {
    SourceTreeFixture::new()
        .file("references/README.md", "index")
        .file("references/general/style.md", "style")
        .file("references/runtime/env.md", "env")
        .file("references/shell/bash.md", "bash")
        .file("references/python/typing.md", "typing")
        .file("references/go/modules.md", "modules")
        .file("references/vcs/vcs-platform-commands.ref.md", "commands")
        .file("references/vcs/code-review-posting-github.ref.md", "github")
        .file("references/vcs/code-review-posting-gitlab.ref.md", "gitlab")
        .file("references/vcs/branching.md", "branching")
}
