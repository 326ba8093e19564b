//! Tests for the `status` command

use crate::helpers::*;
use anyhow::Result;
use std::fs;

#[test]
fn test_status_json() -> Result<()> {
  let env = TestEnv::new()?;
  env.add_packaged_project("foo", Some(".git"))?;
  let svn = env.add_project("bar", Some(".svn"))?;
  fs::create_dir_all(svn.join("build"))?;
  fs::write(
    svn.join("meson.build"),
    "project('bar', 'c',\n  version : '0.4.1',\n)\n",
  )?;

  let output = env.run_acb(&["status", "--json"])?;
  let statuses: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  let statuses = statuses.as_array().unwrap();
  assert_eq!(statuses.len(), 2);

  assert_eq!(statuses[0]["name"], "bar");
  assert_eq!(statuses[0]["vcs"], "subversion");
  assert_eq!(statuses[0]["builder"], "ninja");
  assert_eq!(statuses[0]["version"], "0.4.1");
  assert_eq!(statuses[0]["has_template"], false);

  assert_eq!(statuses[1]["name"], "foo");
  assert_eq!(statuses[1]["vcs"], "git");
  assert_eq!(statuses[1]["version"], "1.0");
  assert_eq!(statuses[1]["release"], 0);
  assert_eq!(statuses[1]["has_template"], true);

  // Looking does not create records or run tools
  assert!(!env.record_path("bar").exists());
  assert!(env.calls().is_empty());
  Ok(())
}

#[test]
fn test_status_table() -> Result<()> {
  let env = TestEnv::new()?;
  env.add_project("foo", None)?;
  env.write_record("foo", "Disabled = true\nRelease = 9\n")?;

  let output = env.run_acb(&["status", "foo"])?;
  let out = stdout(&output);
  assert!(out.contains("PROJECT"));
  let row = out.lines().find(|l| l.starts_with("foo")).unwrap();
  assert!(row.contains("unknown"));
  assert!(row.contains("disabled"));
  assert!(row.contains('9'));
  Ok(())
}

#[test]
fn test_status_unknown_project() -> Result<()> {
  let env = TestEnv::new()?;
  let output = env.acb(&["status", "ghost"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("Project 'ghost' does not exist"));
  Ok(())
}
