//! Per-project pipeline: clean, update, make and build
//!
//! # Steps
//!
//! Every external action runs as a named [`Step`] that prints a start marker
//! and a completion marker. A failed step aborts the rest of its operation;
//! steps that already completed are never undone.
//!
//! # Release counter
//!
//! `build` bumps the release counter only after the spec was rendered, the
//! tarball copied and the package built. No failure path touches it.

use crate::core::context::Context;
use crate::core::error::{AcbError, AcbResult, CommandError, ConfigError, ResultExt};
use crate::core::project::{BuildTarget, Project};
use crate::core::runner::{CommandOutput, CommandRunner};
use crate::core::version;
use crate::release::publish;
use crate::release::spec::{self, BuildStamp, SpecValues};
use crate::ui::StepReporter;
use crate::utils::{display_command, to_argv, write_file_with_parents};
use chrono::{Local, NaiveDate};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The operations a caller can request, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  Clean,
  Update,
  Make,
  Build,
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Operation::Clean => "clean",
      Operation::Update => "update",
      Operation::Make => "make",
      Operation::Build => "build",
    };
    f.write_str(name)
  }
}

/// A unit of work inside an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  Cleaning,
  GarbageCollecting,
  GettingUpdates,
  ShowingUpdates,
  Updating,
  BuildingLocally,
  CreatingTarball,
  CopyingTarball,
  BuildingPackage,
}

impl Step {
  pub fn title(self) -> &'static str {
    match self {
      Step::Cleaning => "Cleaning",
      Step::GarbageCollecting => "Garbage collecting",
      Step::GettingUpdates => "Getting updates",
      Step::ShowingUpdates => "Showing updates",
      Step::Updating => "Updating",
      Step::BuildingLocally => "Building locally",
      Step::CreatingTarball => "Creating tarball",
      Step::CopyingTarball => "Copying tarball",
      Step::BuildingPackage => "Building package",
    }
  }

  /// Kind used in `<project>-<kind>.log`; `None` means stdout is not kept
  pub fn log_kind(self) -> Option<&'static str> {
    match self {
      Step::Cleaning => Some("clean"),
      Step::GettingUpdates => Some("fetch"),
      Step::Updating => Some("update"),
      Step::BuildingLocally => Some("make"),
      Step::CreatingTarball => Some("dist"),
      Step::BuildingPackage => Some("build"),
      Step::GarbageCollecting | Step::ShowingUpdates | Step::CopyingTarball => None,
    }
  }
}

/// Where a pipeline is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
  Idle,
  /// The project is disabled; operations are no-ops
  Disabled,
  Running(Step),
  Succeeded,
  /// `step` is the step that failed, or `None` when the failure came between steps
  Failed { step: Option<Step>, cause: String },
}

/// Runs operations for one project
pub struct ProjectPipeline<'a, R: CommandRunner> {
  ctx: &'a Context,
  runner: &'a R,
  reporter: StepReporter,
  project: Project,
  state: PipelineState,
}

impl<'a, R: CommandRunner> ProjectPipeline<'a, R> {
  pub fn new(ctx: &'a Context, runner: &'a R, reporter: StepReporter, project: Project) -> Self {
    Self {
      ctx,
      runner,
      reporter,
      project,
      state: PipelineState::Idle,
    }
  }

  pub fn project(&self) -> &Project {
    &self.project
  }

  pub fn state(&self) -> &PipelineState {
    &self.state
  }

  /// Run one requested operation
  pub fn run(&mut self, operation: Operation) -> AcbResult<()> {
    match operation {
      Operation::Clean => self.clean(),
      Operation::Update => self.update(),
      Operation::Make => self.make(),
      Operation::Build => self.build(),
    }
  }

  /// Clean the build tree, then compact the repository if it is git
  pub fn clean(&mut self) -> AcbResult<()> {
    self.execute(|p| {
      let argv = p.project.builder.argv(&p.ctx.config.tools, BuildTarget::Clean);
      let build_path = p.project.build_path.clone();
      p.run_command(Step::Cleaning, &build_path, argv)?;

      if let Some(gc) = p.project.vcs.commands().gc {
        let source_path = p.project.source_path.clone();
        p.run_command(Step::GarbageCollecting, &source_path, to_argv(gc))?;
      }
      Ok(())
    })
  }

  /// Fetch and apply upstream changes with the checkout's VCS client
  pub fn update(&mut self) -> AcbResult<()> {
    self.execute(|p| {
      let commands = p.project.vcs.commands();
      let Some(update) = commands.update else {
        p.reporter.note(&format!("{}: no detected RCS", p.project.name));
        return Ok(());
      };
      let source_path = p.project.source_path.clone();

      if let Some(fetch) = commands.fetch {
        p.run_command(Step::GettingUpdates, &source_path, to_argv(fetch))?;
      }

      if let Some(show) = commands.show_updates
        && let Err(err) = p.run_command(Step::ShowingUpdates, &source_path, to_argv(show))
      {
        tracing::warn!(project = %p.project.name, error = %err, "could not show incoming changes");
        p.state = PipelineState::Idle;
      }

      p.run_command(Step::Updating, &source_path, to_argv(update))?;
      Ok(())
    })
  }

  /// Build the project locally
  pub fn make(&mut self) -> AcbResult<()> {
    self.execute(|p| {
      let argv = p.project.builder.argv(&p.ctx.config.tools, BuildTarget::All);
      let build_path = p.project.build_path.clone();
      p.run_command(Step::BuildingLocally, &build_path, argv)?;
      Ok(())
    })
  }

  /// Package the project and publish the result, stamped with today's date
  pub fn build(&mut self) -> AcbResult<()> {
    self.build_on(Local::now().date_naive())
  }

  /// Package the project and publish the result, stamped with `date`
  pub fn build_on(&mut self, date: NaiveDate) -> AcbResult<()> {
    self.execute(|p| p.build_steps(date))
  }

  fn build_steps(&mut self, date: NaiveDate) -> AcbResult<()> {
    let name = self.project.name.clone();

    let template = self.project.template_path(self.ctx.templates_dir());
    if !template.is_file() {
      return Err(AcbError::Config(ConfigError::MissingTemplate { name, path: template }));
    }

    let argv = self.project.builder.argv(&self.ctx.config.tools, BuildTarget::Dist);
    let build_path = self.project.build_path.clone();
    self.run_command(Step::CreatingTarball, &build_path, argv)?;

    self.purge_build_output();

    let version = self
      .project
      .refresh_version()
      .map(str::to_string)
      .ok_or_else(|| AcbError::Config(ConfigError::MissingVersion { name: name.clone() }))?;
    let stamp = BuildStamp::new(date, self.project.vcs);
    let values = SpecValues::new(&version, self.project.release(), &stamp);
    let rendered = spec::render(&name, &template, &values)?;
    let spec_path = self.ctx.workspace.specs().join(format!("{}.spec", name));
    write_file_with_parents(&spec_path, &rendered)?;
    tracing::debug!(project = %name, spec = %spec_path.display(), alpha_tag = %stamp.alpha_tag, "rendered spec");

    let tarball = version::find_tarball(
      &name,
      &self.project.source_path,
      &self.project.build_path,
      &self.project.tarball_name,
      &version,
    )?;
    self.step(Step::CopyingTarball, |p| p.copy_tarball(&tarball))?;

    let argv = vec![
      self.ctx.config.tools.rpmbuild.clone(),
      "-ba".to_string(),
      "--define".to_string(),
      format!("_topdir {}", self.project.rpmbuild_root.display()),
      spec_path.to_string_lossy().into_owned(),
    ];
    let source_path = self.project.source_path.clone();
    self.run_command(Step::BuildingPackage, &source_path, argv)?;

    self.reporter.start("Incrementing release", &name);
    match self.ctx.store.bump(&mut self.project.record) {
      Ok(release) => {
        self.reporter.done();
        tracing::debug!(project = %name, release, record = %self.project.record.file().display(), "release bumped");
      }
      Err(err) => {
        self.reporter.failed();
        return Err(err);
      }
    }

    self.publish()?;

    if let Err(err) = fs::remove_file(&spec_path) {
      tracing::warn!(spec = %spec_path.display(), error = %err, "failed to remove rendered spec");
    }
    Ok(())
  }

  /// Empty RPMS and SRPMS so only this build's output gets published
  fn purge_build_output(&self) {
    self.reporter.start("Cleaning previous package files", &self.project.name);
    let removed = publish::purge_workspace(&self.ctx.workspace.srpms()) + publish::purge_workspace(&self.ctx.workspace.rpms());
    tracing::debug!(removed, "purged packaging output");
    self.reporter.done();
  }

  fn copy_tarball(&self, tarball: &Path) -> AcbResult<()> {
    let sources = self.ctx.workspace.sources();
    fs::create_dir_all(&sources).with_context(|| format!("Failed to create {}", sources.display()))?;
    let file_name = tarball
      .file_name()
      .ok_or_else(|| AcbError::message(format!("Tarball path has no file name: {}", tarball.display())))?;
    let dest = sources.join(file_name);
    fs::copy(tarball, &dest)
      .with_context(|| format!("Failed to copy {} to {}", tarball.display(), dest.display()))?;
    Ok(())
  }

  /// Replace this project's packages in the repository tree
  fn publish(&self) -> AcbResult<()> {
    let prefix = self.project.artifact_prefix();
    let routes = self.ctx.workspace.publish_routes(&self.ctx.config.repository);

    self.reporter.start("Deleting old versions", &self.project.name);
    let mut purged: Vec<&PathBuf> = Vec::new();
    for (_, dest) in &routes {
      if !purged.contains(&dest) {
        publish::remove_prefixed(dest, &prefix);
        purged.push(dest);
      }
    }
    self.reporter.done();

    self.reporter.start("Copying new version", &self.project.name);
    let mut published = 0;
    for (src, dest) in &routes {
      match publish::move_prefixed(src, &prefix, dest) {
        Ok(count) => published += count,
        Err(err) => {
          self.reporter.failed();
          return Err(err);
        }
      }
    }
    self.reporter.done();

    if published == 0 {
      tracing::warn!(project = %self.project.name, "package build produced no artifacts to publish");
    }
    Ok(())
  }

  /// Skip disabled projects and track the final state of an operation
  fn execute<F>(&mut self, body: F) -> AcbResult<()>
  where
    F: FnOnce(&mut Self) -> AcbResult<()>,
  {
    if self.project.disabled() {
      tracing::debug!(project = %self.project.name, "disabled, skipping");
      self.state = PipelineState::Disabled;
      return Ok(());
    }

    self.state = PipelineState::Idle;
    match body(self) {
      Ok(()) => {
        self.state = PipelineState::Succeeded;
        Ok(())
      }
      Err(err) => {
        let step = match self.state {
          PipelineState::Running(step) => Some(step),
          _ => None,
        };
        self.state = PipelineState::Failed {
          step,
          cause: err.to_string(),
        };
        Err(err)
      }
    }
  }

  /// Enter a step, printing its start and completion markers
  fn step<T, F>(&mut self, step: Step, body: F) -> AcbResult<T>
  where
    F: FnOnce(&mut Self) -> AcbResult<T>,
  {
    self.state = PipelineState::Running(step);
    self.reporter.start(step.title(), &self.project.name);
    let result = body(self);
    match &result {
      Ok(_) => {
        self.state = PipelineState::Idle;
        if step != Step::ShowingUpdates {
          self.reporter.done();
        }
      }
      Err(_) => self.reporter.failed(),
    }
    result
  }

  /// Run an external command as a step; non-zero exit is a failure
  fn run_command(&mut self, step: Step, workdir: &Path, argv: Vec<String>) -> AcbResult<CommandOutput> {
    self.step(step, |p| {
      let output = p.runner.run(workdir, &argv)?;
      if !output.success() {
        return Err(AcbError::Command(CommandError::Failed {
          step: step.title().to_string(),
          command: display_command(&argv),
          code: output.code,
          stderr: output.stderr,
        }));
      }

      if let Some(kind) = step.log_kind() {
        write_file_with_parents(&p.ctx.log_path(&p.project.name, kind), &output.stdout)?;
      }
      if step == Step::ShowingUpdates {
        p.reporter.show(&output.stdout, "No updates");
      }
      Ok(output)
    })
  }
}
