//! Spec template rendering
//!
//! Templates are plain text with four literal placeholders. There is no
//! escaping: every occurrence is replaced.

use crate::core::error::{AcbError, AcbResult, ConfigError, ResultExt};
use crate::core::vcs::VcsKind;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

pub const TOKEN_VERSION: &str = "#VERSION#";
pub const TOKEN_BUILD: &str = "#BUILD#";
pub const TOKEN_ALPHATAG: &str = "#ALPHATAG#";
pub const TOKEN_LONGDATE: &str = "#LONGDATE#";

/// Date-derived values for one package build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStamp {
  /// `YYYYMMDD`
  pub short_date: String,
  /// Changelog style, e.g. `Tue Mar 05 2024`
  pub long_date: String,
  /// `.YYYYMMDD<vcs>`, empty when the VCS has no suffix
  pub alpha_tag: String,
}

impl BuildStamp {
  pub fn new(date: NaiveDate, vcs: VcsKind) -> Self {
    let short_date = date.format("%Y%m%d").to_string();
    let long_date = date.format("%a %b %d %Y").to_string();
    let alpha_tag = vcs
      .alpha_suffix()
      .map(|suffix| format!(".{}{}", short_date, suffix))
      .unwrap_or_default();
    Self {
      short_date,
      long_date,
      alpha_tag,
    }
  }
}

/// Values substituted into a spec template
#[derive(Debug, Clone, Copy)]
pub struct SpecValues<'a> {
  pub version: &'a str,
  pub release: u32,
  pub alpha_tag: &'a str,
  pub long_date: &'a str,
}

impl<'a> SpecValues<'a> {
  pub fn new(version: &'a str, release: u32, stamp: &'a BuildStamp) -> Self {
    Self {
      version,
      release,
      alpha_tag: &stamp.alpha_tag,
      long_date: &stamp.long_date,
    }
  }
}

/// Substitute every placeholder in template text
pub fn render_text(template: &str, values: &SpecValues<'_>) -> String {
  template
    .replace(TOKEN_VERSION, values.version)
    .replace(TOKEN_BUILD, &values.release.to_string())
    .replace(TOKEN_ALPHATAG, values.alpha_tag)
    .replace(TOKEN_LONGDATE, values.long_date)
}

/// Read a template file and render it
pub fn render(project: &str, template_path: &Path, values: &SpecValues<'_>) -> AcbResult<String> {
  if !template_path.is_file() {
    return Err(AcbError::Config(ConfigError::MissingTemplate {
      name: project.to_string(),
      path: template_path.to_path_buf(),
    }));
  }
  let template = fs::read_to_string(template_path)
    .with_context(|| format!("Failed to read spec template {}", template_path.display()))?;
  Ok(render_text(&template, values))
}
