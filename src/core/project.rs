//! The project a pipeline invocation operates on
//!
//! A `Project` is built once per invocation from its release record and the
//! checkout on disk, then owned by exactly one pipeline.

use crate::core::config::ToolsConfig;
use crate::core::context::Context;
use crate::core::error::{AcbError, AcbResult, ConfigError};
use crate::core::vcs::VcsKind;
use crate::core::version;
use crate::release::ProjectRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Local build driver, picked by whether a `build/` directory exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Builder {
  Make,
  Ninja,
}

/// Targets the pipeline asks the builder for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTarget {
  All,
  Clean,
  Dist,
}

impl Builder {
  /// Argument vector for a target
  pub fn argv(self, tools: &ToolsConfig, target: BuildTarget) -> Vec<String> {
    let program = match self {
      Builder::Make => &tools.make,
      Builder::Ninja => &tools.ninja,
    };
    let mut argv = vec![program.clone()];
    match target {
      BuildTarget::All => {}
      BuildTarget::Clean => argv.push("clean".to_string()),
      BuildTarget::Dist => argv.push("dist".to_string()),
    }
    argv
  }
}

#[derive(Debug)]
pub struct Project {
  pub name: String,
  pub source_path: PathBuf,
  /// `source_path/build` for ninja projects, else `source_path`
  pub build_path: PathBuf,
  pub builder: Builder,
  /// Packaging workspace root
  pub rpmbuild_root: PathBuf,
  /// Resolved once at construction
  pub vcs: VcsKind,
  pub version: Option<String>,
  pub tarball_name: String,
  pub record: ProjectRecord,
}

impl Project {
  /// Load the record for `name` and inspect its checkout
  ///
  /// The record file is created only once the checkout is known to exist.
  pub fn open(ctx: &Context, name: &str) -> AcbResult<Self> {
    let record = ctx.store.read(name)?;
    let mut project = Self::from_record(record, &ctx.config.paths.code_root, ctx.workspace.root())?;
    if !project.record.file().exists() {
      project.record = ctx.store.load(name)?;
    }
    Ok(project)
  }

  /// Merge a loaded record with what is found on disk
  ///
  /// A disabled project may have no checkout at all.
  pub fn from_record(record: ProjectRecord, code_root: &Path, rpmbuild_root: &Path) -> AcbResult<Self> {
    let source_path = record.path.clone().unwrap_or_else(|| code_root.join(&record.name));
    if !record.disabled && !source_path.is_dir() {
      return Err(AcbError::Config(ConfigError::ProjectNotFound {
        name: record.name.clone(),
        path: source_path,
      }));
    }

    let separate_build = source_path.join("build");
    let (build_path, builder) = if separate_build.is_dir() {
      (separate_build, Builder::Ninja)
    } else {
      (source_path.clone(), Builder::Make)
    };

    let vcs = VcsKind::detect(&source_path);
    let version = version::resolve_version(record.version.as_deref(), &build_path, &source_path);
    let tarball_name = record.tarball_name.clone().unwrap_or_else(|| record.name.clone());

    tracing::debug!(
      project = %record.name,
      %vcs,
      ?builder,
      version = version.as_deref().unwrap_or("unknown"),
      "opened project"
    );

    Ok(Self {
      name: record.name.clone(),
      source_path,
      build_path,
      builder,
      rpmbuild_root: rpmbuild_root.to_path_buf(),
      vcs,
      version,
      tarball_name,
      record,
    })
  }

  pub fn release(&self) -> u32 {
    self.record.release
  }

  pub fn disabled(&self) -> bool {
    self.record.disabled
  }

  /// Resolve the version again if it is still unknown
  ///
  /// A build may generate `config.h`; an already resolved value is kept.
  pub fn refresh_version(&mut self) -> Option<&str> {
    if self.version.is_none() {
      self.version = version::resolve_version(self.record.version.as_deref(), &self.build_path, &self.source_path);
    }
    self.version.as_deref()
  }

  /// Spec template location
  pub fn template_path(&self, templates_dir: Option<&Path>) -> PathBuf {
    let file = format!("{}.spec.in", self.name);
    match templates_dir {
      Some(dir) => dir.join(file),
      None => self.source_path.join(".acb").join(file),
    }
  }

  /// Prefix shared by every package file built from this project
  pub fn artifact_prefix(&self) -> String {
    format!("{}-", self.tarball_name)
  }
}
