pub mod agents;
pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod fetch;
pub mod test_utils;
pub mod utils;

pub use error::{Result, SkillsError};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
