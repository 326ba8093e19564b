use crate::core::error::{AcbError, AcbResult, ConfigError, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "ACB_CONFIG";

/// Configuration for acb
/// Searched in order: --config, $ACB_CONFIG, <config_dir>/acb/config.toml, ~/.acb.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcbConfig {
  pub paths: PathsConfig,
  #[serde(default)]
  pub repository: RepositoryConfig,
  #[serde(default)]
  pub tools: ToolsConfig,
}

/// Filesystem roots used by the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
  /// Directory holding one checkout per project
  pub code_root: PathBuf,

  /// Packaging workspace (SOURCES, SPECS, SRPMS, RPMS, REPOS)
  pub rpmbuild_root: PathBuf,

  /// Directory holding one `<name>.toml` record per project
  pub projects_dir: PathBuf,

  /// Directory for `<project>-<kind>.log` files
  pub log_dir: PathBuf,

  /// Central spec template directory (default: `<source>/.acb`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub templates_dir: Option<PathBuf>,
}

/// Where published packages land under `REPOS/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
  /// Distribution subtree, e.g. "fedora" or "fedora/40"
  #[serde(default = "default_distro")]
  pub distro: String,

  /// Binary architecture directory name
  #[serde(default = "default_arch")]
  pub arch: String,
}

fn default_distro() -> String {
  "fedora".to_string()
}

fn default_arch() -> String {
  std::env::consts::ARCH.to_string()
}

impl Default for RepositoryConfig {
  fn default() -> Self {
    Self {
      distro: default_distro(),
      arch: default_arch(),
    }
  }
}

/// Program names for the external build tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
  #[serde(default = "default_make")]
  pub make: String,
  #[serde(default = "default_ninja")]
  pub ninja: String,
  #[serde(default = "default_rpmbuild")]
  pub rpmbuild: String,
}

fn default_make() -> String {
  "make".to_string()
}

fn default_ninja() -> String {
  "ninja".to_string()
}

fn default_rpmbuild() -> String {
  "rpmbuild".to_string()
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      make: default_make(),
      ninja: default_ninja(),
      rpmbuild: default_rpmbuild(),
    }
  }
}

impl AcbConfig {
  /// Candidate config locations, most specific first
  pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
      candidates.push(path.to_path_buf());
      return candidates;
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
      candidates.push(PathBuf::from(path));
    }
    if let Some(dir) = dirs::config_dir() {
      candidates.push(dir.join("acb").join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
      candidates.push(home.join(".acb.toml"));
    }
    candidates
  }

  /// Find config file in search order
  pub fn find_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    Self::candidate_paths(explicit).into_iter().find(|p| p.exists())
  }

  /// Where `acb init` writes: the most specific candidate
  pub fn init_path(explicit: Option<&Path>) -> AcbResult<PathBuf> {
    Self::candidate_paths(explicit)
      .into_iter()
      .next()
      .ok_or_else(|| AcbError::with_help("Could not determine a config location", "Pass --config <path>."))
  }

  /// Load config, searching the default locations
  pub fn load(explicit: Option<&Path>) -> AcbResult<Self> {
    let config_path = Self::find_config_path(explicit).ok_or_else(|| {
      AcbError::Config(ConfigError::NotFound {
        searched: Self::candidate_paths(explicit),
      })
    })?;
    Self::load_from(&config_path)
  }

  /// Load config from a specific file
  pub fn load_from(config_path: &Path) -> AcbResult<Self> {
    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: AcbConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;
    Ok(config)
  }

  /// Save config to the given file, creating its directory
  pub fn save(&self, config_path: &Path) -> AcbResult<()> {
    if let Some(parent) = config_path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(())
  }

  /// Default config rooted at the user's home directory
  pub fn with_home_defaults() -> AcbResult<Self> {
    let home = dirs::home_dir().ok_or_else(|| AcbError::message("Could not determine the home directory"))?;
    let config_dir = dirs::config_dir().unwrap_or_else(|| home.join(".config"));
    let cache_dir = dirs::cache_dir().unwrap_or_else(|| home.join(".cache"));
    Ok(Self::new(
      home.join("Code"),
      home.join("rpmbuild"),
      config_dir.join("acb").join("projects"),
      cache_dir.join("acb").join("logs"),
    ))
  }

  /// Create a config with explicit roots and default repository/tools
  pub fn new(code_root: PathBuf, rpmbuild_root: PathBuf, projects_dir: PathBuf, log_dir: PathBuf) -> Self {
    Self {
      paths: PathsConfig {
        code_root,
        rpmbuild_root,
        projects_dir,
        log_dir,
        templates_dir: None,
      },
      repository: RepositoryConfig::default(),
      tools: ToolsConfig::default(),
    }
  }
}
