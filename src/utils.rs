//! Small helpers for paths and command display

use crate::core::error::{AcbResult, ResultExt};
use std::fs;
use std::path::Path;

/// Render an argument vector for messages and logs
///
/// Arguments containing whitespace or quotes are single-quoted so the output
/// reads unambiguously. This is for humans only; commands are never re-parsed.
pub fn display_command(argv: &[String]) -> String {
  argv
    .iter()
    .map(|arg| {
      if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        format!("'{}'", arg.replace('\'', "'\\''"))
      } else {
        arg.clone()
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

/// Build an owned argument vector from borrowed parts
pub fn to_argv<S: AsRef<str>>(parts: &[S]) -> Vec<String> {
  parts.iter().map(|p| p.as_ref().to_string()).collect()
}

/// Overwrite `path` with `contents`, creating parent directories first
pub fn write_file_with_parents(path: &Path, contents: &str) -> AcbResult<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(())
}

/// Whether a directory entry name is hidden (dot-prefixed)
pub fn is_hidden(name: &str) -> bool {
  name.starts_with('.')
}
