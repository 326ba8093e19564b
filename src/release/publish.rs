//! Packaging workspace layout and artifact publication

use crate::core::config::RepositoryConfig;
use crate::core::error::{AcbError, AcbResult, PublishError, ResultExt};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fixed subtree layout under the packaging workspace root
#[derive(Debug, Clone)]
pub struct PackagingWorkspace {
  root: PathBuf,
}

impl PackagingWorkspace {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn sources(&self) -> PathBuf {
    self.root.join("SOURCES")
  }

  pub fn specs(&self) -> PathBuf {
    self.root.join("SPECS")
  }

  pub fn srpms(&self) -> PathBuf {
    self.root.join("SRPMS")
  }

  pub fn rpms(&self) -> PathBuf {
    self.root.join("RPMS")
  }

  /// `REPOS/<distro>`
  pub fn repo_root(&self, repo: &RepositoryConfig) -> PathBuf {
    self.root.join("REPOS").join(&repo.distro)
  }

  /// Where binary packages are published
  pub fn repo_binary_dir(&self, repo: &RepositoryConfig) -> PathBuf {
    self.repo_root(repo).join(&repo.arch)
  }

  /// Where source packages are published
  pub fn repo_source_dir(&self, repo: &RepositoryConfig) -> PathBuf {
    self.repo_root(repo).join("SRPMS")
  }

  /// (build output dir, repository dir) pairs, in publication order
  pub fn publish_routes(&self, repo: &RepositoryConfig) -> Vec<(PathBuf, PathBuf)> {
    let binary = self.repo_binary_dir(repo);
    vec![
      (self.rpms().join(&repo.arch), binary.clone()),
      (self.rpms().join("noarch"), binary),
      (self.srpms(), self.repo_source_dir(repo)),
    ]
  }

  /// Create every fixed subtree
  pub fn ensure_layout(&self, repo: &RepositoryConfig) -> AcbResult<()> {
    for dir in [
      self.sources(),
      self.specs(),
      self.srpms(),
      self.rpms(),
      self.repo_binary_dir(repo),
      self.repo_source_dir(repo),
    ] {
      fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
  }
}

/// Entries of a directory whose names start with `prefix`, sorted by name
fn matching_entries(dir: &Path, prefix: &str) -> io::Result<Vec<fs::DirEntry>> {
  let mut entries = Vec::new();
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    if entry.file_name().to_string_lossy().starts_with(prefix) {
      entries.push(entry);
    }
  }
  entries.sort_by_key(|e| e.file_name());
  Ok(entries)
}

/// Delete every entry in `dir` whose name starts with `prefix`
///
/// Best effort: an unreadable directory means nothing to purge, and entries
/// that cannot be removed are logged and skipped. Returns the number removed.
pub fn remove_prefixed(dir: &Path, prefix: &str) -> usize {
  let entries = match matching_entries(dir, prefix) {
    Ok(entries) => entries,
    Err(err) if err.kind() == io::ErrorKind::NotFound => {
      tracing::debug!(dir = %dir.display(), "nothing to purge, directory does not exist");
      return 0;
    }
    Err(err) => {
      tracing::warn!(dir = %dir.display(), error = %err, "cannot open directory");
      return 0;
    }
  };

  let mut removed = 0;
  for entry in entries {
    let path = entry.path();
    let result = match entry.file_type() {
      Ok(kind) if kind.is_dir() => fs::remove_dir_all(&path),
      _ => fs::remove_file(&path),
    };
    match result {
      Ok(()) => removed += 1,
      Err(err) => tracing::warn!(path = %path.display(), error = %err, "failed to delete"),
    }
  }
  removed
}

/// Remove everything inside `dir`, keeping the directory itself
pub fn purge_workspace(dir: &Path) -> usize {
  remove_prefixed(dir, "")
}

/// Copy every file in `src` whose name starts with `prefix` into `dest`
///
/// The source files stay in place. A missing source directory publishes
/// nothing. Every matching file is attempted; if any copy fails the whole
/// batch is reported as a [`PublishError`]. Returns the number copied.
pub fn move_prefixed(src: &Path, prefix: &str, dest: &Path) -> AcbResult<usize> {
  let entries = match matching_entries(src, prefix) {
    Ok(entries) => entries,
    Err(err) if err.kind() == io::ErrorKind::NotFound => {
      tracing::debug!(dir = %src.display(), "no build output to publish");
      return Ok(0);
    }
    Err(err) => {
      tracing::warn!(dir = %src.display(), error = %err, "cannot open directory");
      return Ok(0);
    }
  };

  let files: Vec<PathBuf> = entries
    .into_iter()
    .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
    .map(|e| e.path())
    .collect();
  if files.is_empty() {
    return Ok(0);
  }

  fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;

  let mut copied = 0;
  let mut failures = Vec::new();
  for file in files {
    let Some(name) = file.file_name() else {
      continue;
    };
    match fs::copy(&file, dest.join(name)) {
      Ok(_) => {
        tracing::debug!(from = %file.display(), to = %dest.display(), "published artifact");
        copied += 1;
      }
      Err(err) => failures.push((file, err.to_string())),
    }
  }

  if !failures.is_empty() {
    return Err(AcbError::Publish(PublishError::CopyFailed {
      dest: dest.to_path_buf(),
      failures,
    }));
  }
  Ok(copied)
}
