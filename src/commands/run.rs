//! `acb run`: drive the pipeline over a batch of projects

use crate::commands::select_projects;
use crate::core::context::Context;
use crate::core::error::{AcbError, AcbResult, print_error};
use crate::core::pipeline::{Operation, ProjectPipeline};
use crate::core::project::Project;
use crate::core::runner::CommandRunner;
use crate::ui::StepReporter;
use clap::{ArgGroup, Args};

/// Operations and targets for one batch
#[derive(Debug, Clone, Default, Args)]
#[command(group(ArgGroup::new("operations").required(true).multiple(true)))]
pub struct RunArgs {
  /// Clean the build tree (and garbage-collect git checkouts)
  #[arg(short, long, group = "operations")]
  pub clean: bool,

  /// Fetch and apply upstream changes
  #[arg(short, long, group = "operations")]
  pub update: bool,

  /// Build locally with make or ninja
  #[arg(short, long, group = "operations")]
  pub make: bool,

  /// Build an RPM and publish it into the local repository
  #[arg(short, long, group = "operations")]
  pub build: bool,

  /// Projects to process (default: every checkout under the code root)
  pub projects: Vec<String>,
}

impl RunArgs {
  /// Requested operations in execution order
  pub fn operations(&self) -> Vec<Operation> {
    [
      (self.clean, Operation::Clean),
      (self.update, Operation::Update),
      (self.make, Operation::Make),
      (self.build, Operation::Build),
    ]
    .into_iter()
    .filter_map(|(wanted, op)| wanted.then_some(op))
    .collect()
  }
}

/// Run the requested operations for every selected project
///
/// A failure stops the remaining operations of that project only; the batch
/// carries on and the command fails at the end.
pub fn run_projects<R: CommandRunner>(ctx: &Context, runner: &R, reporter: StepReporter, args: RunArgs) -> AcbResult<()> {
  let operations = args.operations();
  let projects = select_projects(ctx, args.projects)?;

  let mut failed = Vec::new();
  for name in &projects {
    if let Err(err) = run_project(ctx, runner, reporter, name, &operations) {
      tracing::debug!(project = %name, error = %err, "project failed");
      print_error(&err);
      failed.push(name.as_str());
    }
  }

  if failed.is_empty() {
    return Ok(());
  }
  Err(AcbError::with_help(
    format!("{} of {} project(s) failed: {}", failed.len(), projects.len(), failed.join(", ")),
    format!(
      "Command output is kept in {}/<project>-<step>.log",
      ctx.config.paths.log_dir.display()
    ),
  ))
}

fn run_project<R: CommandRunner>(
  ctx: &Context,
  runner: &R,
  reporter: StepReporter,
  name: &str,
  operations: &[Operation],
) -> AcbResult<()> {
  let project = Project::open(ctx, name)?;
  let mut pipeline = ProjectPipeline::new(ctx, runner, reporter, project);
  for &operation in operations {
    tracing::debug!(project = %name, %operation, "starting operation");
    let result = pipeline.run(operation);
    tracing::debug!(project = %pipeline.project().name, state = ?pipeline.state(), "operation finished");
    result?;
  }
  Ok(())
}
