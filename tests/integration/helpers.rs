//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Stands in for make/ninja: `clean`, `dist` (writes `<dir>-1.0.tar.gz`) or a plain build
const FAKE_MAKE: &str = r#"#!/bin/sh
echo "make $*" >> "$ACB_TEST_CALLS"
if [ -f FAIL_MAKE ]; then
  echo "make: *** [all] Error 1" >&2
  exit 2
fi
case "$1" in
  clean) echo "cleaned $(basename "$PWD")" ;;
  dist) printf 'tarball' > "$(basename "$PWD")-1.0.tar.gz"; echo "dist ready" ;;
  *) echo "built $(basename "$PWD")" ;;
esac
"#;

/// Stands in for rpmbuild: reads name, version and release from the spec
const FAKE_RPMBUILD: &str = r#"#!/bin/sh
echo "rpmbuild $*" >> "$ACB_TEST_CALLS"
topdir="${3#_topdir }"
spec="$4"
name=$(basename "$spec" .spec)
version=$(sed -n 's/^Version: *//p' "$spec")
release=$(sed -n 's/^Release: *\([0-9]*\).*/\1/p' "$spec")
cp "$spec" "$topdir/last.spec"
mkdir -p "$topdir/RPMS/x86_64" "$topdir/RPMS/noarch" "$topdir/SRPMS"
touch "$topdir/RPMS/x86_64/$name-$version-$release.x86_64.rpm"
touch "$topdir/RPMS/noarch/$name-doc-$version-$release.noarch.rpm"
touch "$topdir/SRPMS/$name-$version-$release.src.rpm"
echo "Wrote: $name-$version-$release"
"#;

/// Found through PATH instead of the real git
const FAKE_GIT: &str = r#"#!/bin/sh
echo "git $*" >> "$ACB_TEST_CALLS"
case "$1" in
  shortlog) printf 'Someone (1):\n      Fix a bug\n' ;;
  pull) echo "Updating 1234567..89abcde" ;;
esac
"#;

pub const TEMPLATE: &str = "Name: #NAME#\nVersion: #VERSION#\nRelease: #BUILD#%{?alphatag}#ALPHATAG#\n\n%changelog\n* #LONGDATE# Packager <packager@example.com>\n";

/// An isolated home with a config, a code root and fake build tools
pub struct TestEnv {
  _root: TempDir,
  pub path: PathBuf,
  pub config: PathBuf,
  pub code: PathBuf,
  pub rpm: PathBuf,
  pub projects: PathBuf,
  pub logs: PathBuf,
  pub bin: PathBuf,
  pub calls: PathBuf,
}

impl TestEnv {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    let code = path.join("Code");
    let rpm = path.join("rpmbuild");
    let projects = path.join("projects");
    let logs = path.join("logs");
    let bin = path.join("bin");
    fs::create_dir_all(&code)?;
    fs::create_dir_all(&bin)?;

    write_script(&bin.join("fake-make"), FAKE_MAKE)?;
    write_script(&bin.join("fake-rpmbuild"), FAKE_RPMBUILD)?;
    write_script(&bin.join("git"), FAKE_GIT)?;

    let config = path.join("config.toml");
    fs::write(
      &config,
      format!(
        r#"[paths]
code_root = "{code}"
rpmbuild_root = "{rpm}"
projects_dir = "{projects}"
log_dir = "{logs}"

[repository]
distro = "fedora"
arch = "x86_64"

[tools]
make = "{make}"
ninja = "{make}"
rpmbuild = "{rpmbuild}"
"#,
        code = code.display(),
        rpm = rpm.display(),
        projects = projects.display(),
        logs = logs.display(),
        make = bin.join("fake-make").display(),
        rpmbuild = bin.join("fake-rpmbuild").display(),
      ),
    )?;

    let calls = path.join("calls.log");
    Ok(Self {
      _root: root,
      path,
      config,
      code,
      rpm,
      projects,
      logs,
      bin,
      calls,
    })
  }

  /// Create a checkout, optionally with a VCS marker directory
  pub fn add_project(&self, name: &str, marker: Option<&str>) -> Result<PathBuf> {
    let dir = self.code.join(name);
    fs::create_dir_all(&dir)?;
    if let Some(marker) = marker {
      fs::create_dir_all(dir.join(marker))?;
    }
    Ok(dir)
  }

  /// Create a checkout that can be packaged: record with a version and a template
  pub fn add_packaged_project(&self, name: &str, marker: Option<&str>) -> Result<PathBuf> {
    let dir = self.add_project(name, marker)?;
    self.write_record(name, "Version = \"1.0\"\n")?;
    fs::create_dir_all(dir.join(".acb"))?;
    fs::write(
      dir.join(".acb").join(format!("{}.spec.in", name)),
      TEMPLATE.replace("#NAME#", name),
    )?;
    Ok(dir)
  }

  pub fn write_record(&self, name: &str, body: &str) -> Result<()> {
    fs::create_dir_all(&self.projects)?;
    fs::write(self.record_path(name), format!("[defaults]\n{}", body))?;
    Ok(())
  }

  pub fn record_path(&self, name: &str) -> PathBuf {
    self.projects.join(format!("{}.toml", name))
  }

  pub fn read_record(&self, name: &str) -> Result<String> {
    fs::read_to_string(self.record_path(name)).context("Failed to read project record")
  }

  /// Commands the fake tools were invoked with, in order
  pub fn calls(&self) -> Vec<String> {
    fs::read_to_string(&self.calls)
      .map(|s| s.lines().map(|line| line.trim_end().to_string()).collect())
      .unwrap_or_default()
  }

  /// Build an acb command isolated from the real user environment
  pub fn command(&self, args: &[&str]) -> Command {
    self.command_with_config(&self.config, args)
  }

  /// Same as [`TestEnv::command`] with another config file
  pub fn command_with_config(&self, config: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_acb"));
    let path = std::env::var("PATH").unwrap_or_default();
    cmd
      .current_dir(&self.path)
      .arg("--config")
      .arg(config)
      .args(args)
      .env("PATH", format!("{}:{}", self.bin.display(), path))
      .env("HOME", &self.path)
      .env("ACB_TEST_CALLS", &self.calls)
      .env_remove("ACB_CONFIG")
      .env_remove("RUST_LOG");
    cmd
  }

  /// Run acb and return its output whatever the exit status
  pub fn acb(&self, args: &[&str]) -> Result<Output> {
    self.command(args).output().context("Failed to run acb")
  }

  /// Run acb and fail unless it succeeds
  pub fn run_acb(&self, args: &[&str]) -> Result<Output> {
    let output = self.acb(args)?;
    if !output.status.success() {
      anyhow::bail!(
        "acb command failed: acb {}\nstdout: {}\nstderr: {}",
        args.join(" "),
        stdout(&output),
        stderr(&output)
      );
    }
    Ok(output)
  }
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_script(path: &Path, body: &str) -> Result<()> {
  fs::write(path, body)?;
  let mut perms = fs::metadata(path)?.permissions();
  perms.set_mode(0o755);
  fs::set_permissions(path, perms)?;
  Ok(())
}
