//! Per-target lock ledger (`.agent-skills-lock.json`).
//!
//! The ledger records, for each installed skill name, where it came from and
//! at which revision. It is an annex to the filesystem: a missing or corrupt
//! ledger reads as empty and never blocks listing or removal.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::fs::ensure_dir;

/// File name of the ledger inside a target directory.
pub const LOCK_FILENAME: &str = ".agent-skills-lock.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockEntry {
    pub version: String,
    pub repo: String,
    pub installed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockLedger {
    #[serde(default)]
    pub skills: BTreeMap<String, LockEntry>,
}

impl LockLedger {
    #[must_use]
    pub fn path_for(target_dir: &Path) -> PathBuf {
        target_dir.join(LOCK_FILENAME)
    }

    /// Read the ledger of `target_dir`.
    ///
    /// Absent, unreadable, and malformed files all yield an empty ledger.
    #[must_use]
    pub fn read(target_dir: &Path) -> Self {
        let path = Self::path_for(target_dir);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "unreadable lock file, starting empty");
                return Self::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(ledger) => ledger,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "corrupt lock file, starting empty");
                Self::default()
            }
        }
    }

    /// Persist the ledger into `target_dir`, replacing any previous file.
    ///
    /// Entries are written sorted by name. The file is written to a temporary
    /// sibling first and renamed into place.
    pub fn write(&self, target_dir: &Path) -> Result<()> {
        ensure_dir(target_dir)?;
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');

        let mut tmp = tempfile::NamedTempFile::new_in(target_dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(Self::path_for(target_dir))
            .map_err(|err| err.error)?;
        tracing::debug!(dir = %target_dir.display(), entries = self.skills.len(), "wrote lock file");
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LockEntry> {
        self.skills.get(name)
    }

    /// Record `name` as installed now from `repo` at `version`.
    pub fn upsert(&mut self, name: &str, version: &str, repo: &str) {
        self.skills.insert(
            name.to_string(),
            LockEntry {
                version: version.to_string(),
                repo: repo.to_string(),
                installed_at: Utc::now(),
            },
        );
    }

    pub fn remove(&mut self, name: &str) -> Option<LockEntry> {
        self.skills.remove(name)
    }

    /// Whether `name` is recorded at exactly `version`.
    #[must_use]
    pub fn is_current(&self, name: &str, version: &str) -> bool {
        self.skills
            .get(name)
            .is_some_and(|entry| entry.version == version)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }
}
