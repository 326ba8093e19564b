use std::fs;
use std::path::Path;

use crate::core::config::AcbConfig;
use crate::core::error::{AcbResult, ResultExt};
use crate::release::PackagingWorkspace;

/// Write a default configuration and create every directory it names
pub fn run_init(config_path: Option<&Path>, force: bool) -> AcbResult<()> {
  let target = AcbConfig::init_path(config_path)?;

  let config = if target.exists() && !force {
    println!("⚠️  Configuration already exists at {}", target.display());
    println!("   Keeping it; use --force to overwrite. Creating missing directories only.");
    AcbConfig::load_from(&target)?
  } else {
    let config = AcbConfig::with_home_defaults()?;
    config.save(&target)?;
    println!("💾 Configuration saved to: {}", target.display());
    config
  };

  create_layout(&config)?;

  println!("\n✅ acb is ready");
  println!("\n🚀 Next steps:");
  println!("   1. Check the paths in {}", target.display());
  println!("   2. Add a spec template at <checkout>/.acb/<project>.spec.in");
  println!("   3. Run: acb run --build <project>");

  Ok(())
}

/// Create the record, log and packaging directories
pub fn create_layout(config: &AcbConfig) -> AcbResult<()> {
  for dir in [&config.paths.projects_dir, &config.paths.log_dir] {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
  }
  if let Some(dir) = &config.paths.templates_dir {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
  }

  PackagingWorkspace::new(&config.paths.rpmbuild_root).ensure_layout(&config.repository)?;

  if !config.paths.code_root.is_dir() {
    tracing::warn!(code_root = %config.paths.code_root.display(), "code root does not exist yet");
  }
  Ok(())
}
