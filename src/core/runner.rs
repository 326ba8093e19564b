//! External command execution
//!
//! Commands are always spawned from an explicit argument vector; nothing is
//! passed through a shell. Every invocation runs exactly once and blocks until
//! the child exits. Deciding whether a failure is fatal is the caller's job.

use crate::core::error::{AcbError, AcbResult, CommandError};
use crate::utils::display_command;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  pub stdout: String,
  pub stderr: String,
  /// Exit code, `None` if the process was killed by a signal
  pub code: Option<i32>,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Runs external programs for the pipeline
pub trait CommandRunner {
  /// Run `argv` in `workdir` and capture its output
  ///
  /// Only failing to start the program is an error here; a non-zero exit
  /// status is reported through [`CommandOutput::code`].
  fn run(&self, workdir: &Path, argv: &[String]) -> AcbResult<CommandOutput>;
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, workdir: &Path, argv: &[String]) -> AcbResult<CommandOutput> {
    let (program, args) = argv
      .split_first()
      .ok_or_else(|| AcbError::message("Refusing to run an empty command"))?;

    tracing::debug!(cwd = %workdir.display(), command = %display_command(argv), "running");

    let output = Command::new(program)
      .args(args)
      .current_dir(workdir)
      .stdin(Stdio::null())
      .output()
      .map_err(|e| {
        AcbError::Command(CommandError::Spawn {
          command: display_command(argv),
          reason: e.to_string(),
        })
      })?;

    Ok(CommandOutput {
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      code: output.status.code(),
    })
  }
}
