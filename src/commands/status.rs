use serde::Serialize;
use std::path::PathBuf;

use crate::commands::select_projects;
use crate::core::context::Context;
use crate::core::error::AcbResult;
use crate::core::project::{Builder, Project};
use crate::core::vcs::VcsKind;

/// Status information for a single project
#[derive(Debug, Clone, Serialize)]
pub struct ProjectStatus {
  /// Project name
  pub name: String,

  /// Detected version control system
  pub vcs: VcsKind,

  /// Local build driver
  pub builder: Builder,

  /// Resolved version, if any
  pub version: Option<String>,

  /// Current release counter
  pub release: u32,

  pub disabled: bool,

  /// Tarball base name
  pub tarball_name: String,

  pub source_path: PathBuf,

  pub build_path: PathBuf,

  /// Spec template location
  pub template: PathBuf,

  /// Whether the spec template exists
  pub has_template: bool,
}

impl ProjectStatus {
  fn from_project(ctx: &Context, project: &Project) -> Self {
    let template = project.template_path(ctx.templates_dir());
    Self {
      name: project.name.clone(),
      vcs: project.vcs,
      builder: project.builder,
      version: project.version.clone(),
      release: project.release(),
      disabled: project.disabled(),
      tarball_name: project.tarball_name.clone(),
      source_path: project.source_path.clone(),
      build_path: project.build_path.clone(),
      has_template: template.is_file(),
      template,
    }
  }
}

/// Gather status without running any command or writing any file
pub fn collect_status(ctx: &Context, names: Vec<String>) -> AcbResult<Vec<ProjectStatus>> {
  let mut statuses = Vec::new();
  for name in select_projects(ctx, names)? {
    let record = ctx.store.read(&name)?;
    let project = Project::from_record(record, &ctx.config.paths.code_root, ctx.workspace.root())?;
    statuses.push(ProjectStatus::from_project(ctx, &project));
  }
  Ok(statuses)
}

/// Run the status command
pub fn run_status(ctx: &Context, json: bool, names: Vec<String>) -> AcbResult<()> {
  let statuses = collect_status(ctx, names)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&statuses)?);
  } else {
    print_status_table(&statuses);
  }

  Ok(())
}

/// Print status as a formatted table
fn print_status_table(statuses: &[ProjectStatus]) {
  println!("\n📊 Project Status\n");

  println!(
    "{:<24} {:<8} {:<8} {:<14} {:<8} {:<9} SOURCE",
    "PROJECT", "VCS", "BUILDER", "VERSION", "RELEASE", "STATE"
  );
  println!("{:-<100}", "");

  for status in statuses {
    let builder = match status.builder {
      Builder::Make => "make",
      Builder::Ninja => "ninja",
    };
    let state = if status.disabled {
      "disabled"
    } else if !status.has_template {
      "no spec"
    } else {
      "ready"
    };

    println!(
      "{:<24} {:<8} {:<8} {:<14} {:<8} {:<9} {}",
      status.name,
      status.vcs.to_string(),
      builder,
      status.version.as_deref().unwrap_or("-"),
      status.release,
      state,
      status.source_path.display()
    );
  }

  if statuses.is_empty() {
    println!("No projects found.");
  }
  println!();
}
