//! Tests for the `run` command

use crate::helpers::*;
use anyhow::Result;
use std::fs;

#[test]
fn test_build_publishes_and_bumps_release() -> Result<()> {
  let env = TestEnv::new()?;
  env.add_packaged_project("foo", Some(".git"))?;

  let output = env.run_acb(&["run", "--build", "foo"])?;
  let out = stdout(&output);
  assert!(out.contains("Creating tarball foo...\tDone"));
  assert!(out.contains("Building package foo...\tDone"));

  let calls = env.calls();
  assert_eq!(calls[0], "make dist");
  assert!(calls[1].starts_with(&format!("rpmbuild -ba --define _topdir {}", env.rpm.display())));

  let repo = env.rpm.join("REPOS").join("fedora");
  assert!(repo.join("x86_64").join("foo-1.0-0.x86_64.rpm").is_file());
  assert!(repo.join("x86_64").join("foo-doc-1.0-0.noarch.rpm").is_file());
  assert!(repo.join("SRPMS").join("foo-1.0-0.src.rpm").is_file());
  assert!(env.rpm.join("SOURCES").join("foo-1.0.tar.gz").is_file());
  assert!(!env.rpm.join("SPECS").join("foo.spec").exists());

  let spec = fs::read_to_string(env.rpm.join("last.spec"))?;
  assert!(spec.contains("Version: 1.0\n"));
  assert!(spec.contains("Release: 0%{?alphatag}."));
  assert!(spec.contains("git\n"));
  assert!(!spec.contains("#VERSION#"));

  assert!(env.read_record("foo")?.contains("Release = 1"));
  assert_eq!(fs::read_to_string(env.logs.join("foo-dist.log"))?, "dist ready\n");
  Ok(())
}

#[test]
fn test_second_build_replaces_published_package() -> Result<()> {
  let env = TestEnv::new()?;
  env.add_packaged_project("foo", None)?;
  let bin_repo = env.rpm.join("REPOS").join("fedora").join("x86_64");
  fs::create_dir_all(&bin_repo)?;
  fs::write(bin_repo.join("foobar-2.0-1.x86_64.rpm"), "")?;

  env.run_acb(&["run", "-b", "foo"])?;
  env.run_acb(&["run", "-b", "foo"])?;

  assert!(!bin_repo.join("foo-1.0-0.x86_64.rpm").exists());
  assert!(bin_repo.join("foo-1.0-1.x86_64.rpm").is_file());
  assert!(bin_repo.join("foobar-2.0-1.x86_64.rpm").exists());
  assert!(env.read_record("foo")?.contains("Release = 2"));
  Ok(())
}

#[test]
fn test_build_without_template_keeps_release() -> Result<()> {
  let env = TestEnv::new()?;
  env.add_project("foo", None)?;
  env.write_record("foo", "Version = \"1.0\"\nRelease = 3\n")?;

  let output = env.acb(&["run", "--build", "foo"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("No spec template for 'foo'"));
  assert!(env.calls().is_empty());
  assert!(env.read_record("foo")?.contains("Release = 3"));
  Ok(())
}

#[test]
fn test_disabled_project_is_skipped() -> Result<()> {
  let env = TestEnv::new()?;
  env.add_packaged_project("foo", Some(".git"))?;
  env.write_record("foo", "Version = \"1.0\"\nDisabled = true\n")?;
  let before = env.read_record("foo")?;

  env.run_acb(&["run", "-c", "-u", "-m", "-b", "foo"])?;

  assert!(env.calls().is_empty());
  assert!(!env.logs.exists());
  assert!(!env.rpm.exists());
  assert_eq!(env.read_record("foo")?, before);
  Ok(())
}

#[test]
fn test_failure_does_not_stop_the_batch() -> Result<()> {
  let env = TestEnv::new()?;
  let broken = env.add_project("alpha", None)?;
  fs::write(broken.join("FAIL_MAKE"), "")?;
  env.add_project("beta", None)?;

  let output = env.acb(&["run", "--clean", "--make"])?;
  assert_eq!(output.status.code(), Some(1));

  let out = stdout(&output);
  assert!(out.contains("Cleaning alpha...\tFailed"));
  assert!(out.contains("Building locally beta...\tDone"));

  let err = stderr(&output);
  assert!(err.contains("make: *** [all] Error 1"));
  assert!(err.contains("1 of 2 project(s) failed: alpha"));

  assert_eq!(env.calls(), vec!["make clean", "make clean", "make"]);
  assert_eq!(fs::read_to_string(env.logs.join("beta-make.log"))?, "built beta\n");
  assert!(!env.logs.join("alpha-make.log").exists());
  Ok(())
}

#[test]
fn test_clean_is_repeatable() -> Result<()> {
  let env = TestEnv::new()?;
  env.add_project("foo", None)?;

  env.run_acb(&["run", "--clean", "foo"])?;
  let first = fs::read_to_string(env.logs.join("foo-clean.log"))?;
  env.run_acb(&["run", "--clean", "foo"])?;
  let second = fs::read_to_string(env.logs.join("foo-clean.log"))?;

  assert_eq!(first, "cleaned foo\n");
  assert_eq!(first, second);
  Ok(())
}

#[test]
fn test_update_git_checkout() -> Result<()> {
  let env = TestEnv::new()?;
  env.add_project("foo", Some(".git"))?;

  let output = env.run_acb(&["run", "--update", "foo"])?;
  let out = stdout(&output);
  assert!(out.contains("Showing updates foo..."));
  assert!(out.contains("Fix a bug"));
  assert!(out.contains("Updating foo...\tDone"));

  assert_eq!(
    env.calls(),
    vec!["git fetch", "git shortlog HEAD..@{upstream}", "git pull --rebase"]
  );
  assert!(env.logs.join("foo-update.log").is_file());
  Ok(())
}

#[test]
fn test_update_without_vcs_runs_nothing() -> Result<()> {
  let env = TestEnv::new()?;
  env.add_project("plain", None)?;

  let output = env.run_acb(&["run", "--update", "plain"])?;
  assert!(stdout(&output).contains("plain: no detected RCS"));
  assert!(env.calls().is_empty());
  Ok(())
}

#[test]
fn test_all_projects_processed_in_order() -> Result<()> {
  let env = TestEnv::new()?;
  env.add_project("zeta", None)?;
  env.add_project("alpha", None)?;
  env.add_project(".hidden", None)?;

  let output = env.run_acb(&["run", "--make"])?;
  let out = stdout(&output);
  let alpha = out.find("Building locally alpha").unwrap();
  let zeta = out.find("Building locally zeta").unwrap();
  assert!(alpha < zeta);
  assert!(!out.contains(".hidden"));
  Ok(())
}

#[test]
fn test_run_requires_an_operation() -> Result<()> {
  let env = TestEnv::new()?;
  env.add_project("foo", None)?;

  let output = env.acb(&["run", "foo"])?;
  assert!(!output.status.success());
  assert!(env.calls().is_empty());
  Ok(())
}
