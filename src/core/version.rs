//! Version and tarball resolution
//!
//! Sources are consulted in priority order and the first non-empty value
//! wins: the project record, then `config.h` in the build directory, then
//! `meson.build` in the source directory.

use crate::core::error::{AcbError, AcbResult, ConfigError};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_H: &str = "config.h";
const MESON_BUILD: &str = "meson.build";
const MESON_VERSION_MARKER: &str = "version : '";

/// Resolve a project's version, or `None` if no source declares one
pub fn resolve_version(record_version: Option<&str>, build_path: &Path, source_path: &Path) -> Option<String> {
  if let Some(version) = record_version.filter(|v| !v.trim().is_empty()) {
    tracing::debug!(version, "version from project record");
    return Some(version.to_string());
  }

  if let Some(version) = read_optional(&build_path.join(CONFIG_H)).and_then(|text| version_from_config_h(&text)) {
    tracing::debug!(version = %version, "version from config.h");
    return Some(version);
  }

  if let Some(version) = read_optional(&source_path.join(MESON_BUILD)).and_then(|text| version_from_meson(&text)) {
    tracing::debug!(version = %version, "version from meson.build");
    return Some(version);
  }

  None
}

/// Read a file that may legitimately be absent
fn read_optional(path: &Path) -> Option<String> {
  if !path.is_file() {
    return None;
  }
  match fs::read_to_string(path) {
    Ok(text) => Some(text),
    Err(err) => {
      tracing::warn!(path = %path.display(), error = %err, "failed to read version source");
      None
    }
  }
}

/// Extract the version from a generated autoconf header
///
/// `PACKAGE_VERSION` takes priority over `VERSION` wherever each appears.
pub fn version_from_config_h(contents: &str) -> Option<String> {
  define_value(contents, "PACKAGE_VERSION").or_else(|| define_value(contents, "VERSION"))
}

/// Value of the first `#define <macro> <value>` line with a non-empty value
fn define_value(contents: &str, macro_name: &str) -> Option<String> {
  contents.lines().find_map(|line| {
    let rest = line.strip_prefix("#define ")?.trim_start();
    let (name, value) = rest.split_once(char::is_whitespace)?;
    if name != macro_name {
      return None;
    }
    let value = value.replace('"', " ");
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
  })
}

/// Extract the version from a meson build description
///
/// Uses the first line containing `version : '`, up to the closing quote.
pub fn version_from_meson(contents: &str) -> Option<String> {
  let line = contents.lines().find(|line| line.contains(MESON_VERSION_MARKER))?;
  let start = line.find(MESON_VERSION_MARKER)? + MESON_VERSION_MARKER.len();
  let rest = &line[start..];
  let value = match rest.find('\'') {
    Some(end) => &rest[..end],
    None => rest,
  };
  let value = value.trim();
  (!value.is_empty()).then(|| value.to_string())
}

/// Candidate tarball paths in the order they are tried
pub fn tarball_candidates(source_path: &Path, build_path: &Path, tarball_name: &str, version: &str) -> Vec<PathBuf> {
  let versioned = format!("{}-{}", tarball_name, version);
  let mut candidates = Vec::with_capacity(6);

  // Names with a dot already carry their version
  if tarball_name.contains('.') {
    candidates.push(source_path.join(format!("{}.tar.bz2", tarball_name)));
  }
  candidates.push(source_path.join(format!("{}.tar.bz2", versioned)));
  candidates.push(source_path.join(format!("{}.tar.gz", versioned)));
  candidates.push(source_path.join(format!("{}.tar.xz", versioned)));
  candidates.push(build_path.join("meson-dist").join(format!("{}.tar.xz", versioned)));
  candidates.push(source_path.join(format!("{}.zip", versioned)));
  candidates
}

/// First candidate tarball that exists on disk
pub fn find_tarball(
  project: &str,
  source_path: &Path,
  build_path: &Path,
  tarball_name: &str,
  version: &str,
) -> AcbResult<PathBuf> {
  let candidates = tarball_candidates(source_path, build_path, tarball_name, version);
  match candidates.iter().find(|p| p.is_file()) {
    Some(found) => Ok(found.clone()),
    None => Err(AcbError::Config(ConfigError::MissingTarball {
      name: project.to_string(),
      candidates,
    })),
  }
}
