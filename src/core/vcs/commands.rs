//! Per-VCS command table
//!
//! Adding a VCS means adding a row here and a marker in `mod.rs`.

use super::VcsKind;

/// Argument vectors for maintaining a checkout
#[derive(Debug, PartialEq, Eq)]
pub struct VcsCommands {
  /// Download upstream changes without applying them
  pub fetch: Option<&'static [&'static str]>,
  /// Show incoming changes (informational)
  pub show_updates: Option<&'static [&'static str]>,
  /// Apply upstream changes to the working tree
  pub update: Option<&'static [&'static str]>,
  /// Compact the local repository
  pub gc: Option<&'static [&'static str]>,
}

const GIT: VcsCommands = VcsCommands {
  fetch: Some(&["git", "fetch"]),
  show_updates: Some(&["git", "shortlog", "HEAD..@{upstream}"]),
  update: Some(&["git", "pull", "--rebase"]),
  gc: Some(&["git", "gc", "--aggressive"]),
};

const SUBVERSION: VcsCommands = VcsCommands {
  fetch: None,
  show_updates: None,
  update: Some(&["svn", "up"]),
  gc: None,
};

const CVS: VcsCommands = VcsCommands {
  fetch: None,
  show_updates: None,
  update: Some(&["cvs", "up"]),
  gc: None,
};

const BAZAAR: VcsCommands = VcsCommands {
  fetch: None,
  show_updates: None,
  update: Some(&["bzr", "up"]),
  gc: None,
};

const UNKNOWN: VcsCommands = VcsCommands {
  fetch: None,
  show_updates: None,
  update: None,
  gc: None,
};

impl VcsCommands {
  pub fn for_kind(kind: VcsKind) -> &'static VcsCommands {
    match kind {
      VcsKind::Git => &GIT,
      VcsKind::Subversion => &SUBVERSION,
      VcsKind::Cvs => &CVS,
      VcsKind::Bazaar => &BAZAAR,
      VcsKind::Unknown => &UNKNOWN,
    }
  }
}
