//! Version-control detection
//!
//! acb never speaks a VCS protocol itself. It only needs to know which client
//! to shell out to, which it learns from the marker entry in the checkout.

mod commands;

pub use commands::VcsCommands;

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Version-control system governing a checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
  Git,
  Subversion,
  Cvs,
  Bazaar,
  Unknown,
}

/// Marker entries in priority order
const MARKERS: [(&str, VcsKind); 4] = [
  (".git", VcsKind::Git),
  (".svn", VcsKind::Subversion),
  ("CVS", VcsKind::Cvs),
  (".bzr", VcsKind::Bazaar),
];

impl VcsKind {
  /// Classify a checkout by the first marker entry found directly under it
  pub fn detect(source_path: &Path) -> Self {
    MARKERS
      .iter()
      .find(|(marker, _)| source_path.join(marker).exists())
      .map(|(_, kind)| *kind)
      .unwrap_or(VcsKind::Unknown)
  }

  /// Three-letter suffix used in the package alpha-tag
  pub fn alpha_suffix(self) -> Option<&'static str> {
    match self {
      VcsKind::Git => Some("git"),
      VcsKind::Subversion => Some("svn"),
      VcsKind::Cvs => Some("cvs"),
      VcsKind::Bazaar | VcsKind::Unknown => None,
    }
  }

  /// Commands used to maintain a checkout of this kind
  pub fn commands(self) -> &'static VcsCommands {
    VcsCommands::for_kind(self)
  }
}

impl fmt::Display for VcsKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      VcsKind::Git => "git",
      VcsKind::Subversion => "svn",
      VcsKind::Cvs => "cvs",
      VcsKind::Bazaar => "bzr",
      VcsKind::Unknown => "unknown",
    };
    f.write_str(name)
  }
}
