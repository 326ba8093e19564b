//! Core engine for acb operations
//!
//! - **config**: global configuration (paths, repository, tools)
//! - **context**: configuration plus stores, built once per invocation
//! - **error**: error types with contextual help messages
//! - **pipeline**: the clean/update/make/build state machine
//! - **project**: a project's checkout, builder and resolved metadata
//! - **runner**: external command execution
//! - **vcs**: version control detection and command tables
//! - **version**: version and tarball discovery

pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod project;
pub mod runner;
pub mod vcs;
pub mod version;
