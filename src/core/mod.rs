//! Skill discovery, selective installation and bookkeeping.

pub mod cleanup;
pub mod install;
pub mod lock;
pub mod manifest;
pub mod references;
pub mod scan;
pub mod sources;
pub mod workflow;

pub use install::{InstallReport, install_skill, references_dir_for};
pub use lock::{LockEntry, LockLedger};
pub use manifest::SkillManifest;
pub use references::ReferenceSelection;
pub use scan::{LocalInstalledSkill, SkillCandidate};
pub use sources::SourceSet;
