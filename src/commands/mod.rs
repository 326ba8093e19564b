//! CLI commands for acb
//!
//! - **run**: clean/update/make/build a batch of projects
//! - **status**: read-only view of project metadata
//! - **init**: write a default configuration and create directories
//!
//! All commands except `init` take the `&Context` built once in `main.rs`.

pub mod init;
pub mod run;
pub mod status;

pub use init::run_init;
pub use run::{RunArgs, run_projects};
pub use status::run_status;

use crate::core::context::Context;
use crate::core::error::{AcbResult, ResultExt};
use crate::utils::is_hidden;
use std::fs;

/// Named projects, or every visible checkout under the code root, sorted
pub fn select_projects(ctx: &Context, names: Vec<String>) -> AcbResult<Vec<String>> {
  if !names.is_empty() {
    return Ok(names);
  }

  let code_root = &ctx.config.paths.code_root;
  let mut projects = Vec::new();
  for entry in fs::read_dir(code_root).with_context(|| format!("Failed to list {}", code_root.display()))? {
    let entry = entry?;
    if !entry.file_type()?.is_dir() {
      continue;
    }
    let name = entry.file_name().to_string_lossy().into_owned();
    if !is_hidden(&name) {
      projects.push(name);
    }
  }
  projects.sort();
  tracing::debug!(count = projects.len(), root = %code_root.display(), "discovered projects");
  Ok(projects)
}
