//! Tests for the `init` command

use crate::helpers::*;
use anyhow::Result;
use std::fs;

#[test]
fn test_init_creates_config_and_layout() -> Result<()> {
  let env = TestEnv::new()?;
  let target = env.path.join("fresh").join("config.toml");

  let output = env
    .command_with_config(&target, &["init"])
    .env("XDG_CONFIG_HOME", env.path.join(".config"))
    .env("XDG_CACHE_HOME", env.path.join(".cache"))
    .output()?;
  assert!(output.status.success(), "{}", stderr(&output));

  let config = fs::read_to_string(&target)?;
  assert!(config.contains("[paths]"));
  assert!(config.contains("[repository]"));
  assert!(config.contains("[tools]"));

  let rpm = env.path.join("rpmbuild");
  for sub in ["SOURCES", "SPECS", "SRPMS", "RPMS"] {
    assert!(rpm.join(sub).is_dir(), "{} missing", sub);
  }
  assert!(env.path.join(".config").join("acb").join("projects").is_dir());
  assert!(env.path.join(".cache").join("acb").join("logs").is_dir());
  Ok(())
}

#[test]
fn test_init_keeps_existing_config() -> Result<()> {
  let env = TestEnv::new()?;
  let before = fs::read_to_string(&env.config)?;

  env.run_acb(&["init"])?;

  assert_eq!(fs::read_to_string(&env.config)?, before);
  assert!(env.projects.is_dir());
  assert!(env.logs.is_dir());
  assert!(env.rpm.join("REPOS").join("fedora").join("x86_64").is_dir());
  Ok(())
}

#[test]
fn test_missing_config_points_at_init() -> Result<()> {
  let env = TestEnv::new()?;
  let missing = env.path.join("nowhere.toml");

  let output = env.command_with_config(&missing, &["status"]).output()?;

  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("No acb configuration found"));
  assert!(err.contains("acb init"));
  Ok(())
}
