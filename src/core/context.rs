//! Run context - build once, pass everywhere
//!
//! The configuration, release store and packaging workspace are assembled in
//! `main.rs` and handed by reference to every command, so no part of the core
//! ever rediscovers an environment path on its own.

use crate::core::config::AcbConfig;
use crate::core::error::AcbResult;
use crate::release::{PackagingWorkspace, ReleaseStore};
use std::path::Path;

/// Shared data for one acb invocation
#[derive(Debug, Clone)]
pub struct Context {
  /// Global configuration
  pub config: AcbConfig,

  /// Per-project records under `paths.projects_dir`
  pub store: ReleaseStore,

  /// Packaging workspace under `paths.rpmbuild_root`
  pub workspace: PackagingWorkspace,
}

impl Context {
  /// Build the context from the config file (explicit path or default search)
  pub fn load(config_path: Option<&Path>) -> AcbResult<Self> {
    Ok(Self::from_config(AcbConfig::load(config_path)?))
  }

  pub fn from_config(config: AcbConfig) -> Self {
    let store = ReleaseStore::new(&config.paths.projects_dir);
    let workspace = PackagingWorkspace::new(&config.paths.rpmbuild_root);
    Self {
      config,
      store,
      workspace,
    }
  }

  /// Log file for one operation kind of one project
  pub fn log_path(&self, project: &str, kind: &str) -> std::path::PathBuf {
    self.config.paths.log_dir.join(format!("{}-{}.log", project, kind))
  }

  /// Spec template directory override, if configured
  pub fn templates_dir(&self) -> Option<&Path> {
    self.config.paths.templates_dir.as_deref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_log_path() {
    let ctx = Context::from_config(AcbConfig::new(
      "/code".into(),
      "/rpm".into(),
      "/projects".into(),
      "/logs".into(),
    ));
    assert_eq!(ctx.log_path("foo", "make"), Path::new("/logs/foo-make.log"));
    assert_eq!(ctx.store.record_path("foo"), Path::new("/projects/foo.toml"));
    assert_eq!(ctx.workspace.specs(), Path::new("/rpm/SPECS"));
  }
}
