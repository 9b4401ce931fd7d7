//! E2E test suite entry point.

mod fixture;
mod fresh_install;
mod multi_source;
mod remove_workflow;
mod update_workflow;
