//! Error types for acb with contextual messages and exit codes
//!
//! Every fatal condition of the pipeline lands in [`AcbError`]. Configuration
//! problems, subprocess failures and publication failures are kept apart so the
//! batch runner can report them with a helpful suggestion and pick an exit code.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for acb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, missing template, missing tarball)
  User = 1,
  /// System error (subprocess, I/O, publication)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for acb
#[derive(Debug)]
pub enum AcbError {
  /// Configuration errors
  Config(ConfigError),

  /// External command errors
  Command(CommandError),

  /// Artifact publication errors
  Publish(PublishError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl AcbError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    AcbError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    AcbError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// I/O errors are turned into messages so the context is not lost.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      AcbError::Message { message, context, help } => AcbError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      AcbError::Io(err) => AcbError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      AcbError::Config(_) => ExitCode::User,
      AcbError::Command(_) => ExitCode::System,
      AcbError::Publish(_) => ExitCode::System,
      AcbError::Io(_) => ExitCode::System,
      AcbError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      AcbError::Config(e) => e.help_message(),
      AcbError::Command(e) => e.help_message(),
      AcbError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for AcbError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AcbError::Config(e) => write!(f, "{}", e),
      AcbError::Command(e) => write!(f, "{}", e),
      AcbError::Publish(e) => write!(f, "{}", e),
      AcbError::Io(e) => write!(f, "I/O error: {}", e),
      AcbError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for AcbError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      AcbError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for AcbError {
  fn from(err: io::Error) -> Self {
    AcbError::Io(err)
  }
}

impl From<String> for AcbError {
  fn from(msg: String) -> Self {
    AcbError::message(msg)
  }
}

impl From<&str> for AcbError {
  fn from(msg: &str) -> Self {
    AcbError::message(msg)
  }
}

impl From<toml_edit::TomlError> for AcbError {
  fn from(err: toml_edit::TomlError) -> Self {
    AcbError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for AcbError {
  fn from(err: toml_edit::de::Error) -> Self {
    AcbError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for AcbError {
  fn from(err: toml_edit::ser::Error) -> Self {
    AcbError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for AcbError {
  fn from(err: serde_json::Error) -> Self {
    AcbError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Global config file not found
  NotFound { searched: Vec<PathBuf> },

  /// A field in a project record has the wrong type or value
  InvalidField { path: PathBuf, field: String, reason: String },

  /// Project source tree does not exist
  ProjectNotFound { name: String, path: PathBuf },

  /// Spec template missing for a project
  MissingTemplate { name: String, path: PathBuf },

  /// No version could be resolved for a project
  MissingVersion { name: String },

  /// No tarball candidate exists on disk
  MissingTarball { name: String, candidates: Vec<PathBuf> },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `acb init` to create a configuration file.".to_string()),
      ConfigError::InvalidField { field, .. } => Some(format!("Fix or remove the `{}` key and re-run.", field)),
      ConfigError::ProjectNotFound { name, .. } => Some(format!(
        "Check out '{}' under the code root or set `Path` in its project record.",
        name
      )),
      ConfigError::MissingTemplate { .. } => {
        Some("Create the spec template; #VERSION#, #BUILD#, #ALPHATAG# and #LONGDATE# are substituted.".to_string())
      }
      ConfigError::MissingVersion { .. } => Some(
        "Set `Version` in the project record, or make sure config.h or meson.build declares one.".to_string(),
      ),
      ConfigError::MissingTarball { .. } => {
        Some("Set `TarballName` in the project record if the archive is not named after the project.".to_string())
      }
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { searched } => {
        write!(f, "No acb configuration found.\nSearched:")?;
        for path in searched {
          write!(f, "\n  {}", path.display())?;
        }
        Ok(())
      }
      ConfigError::InvalidField { path, field, reason } => {
        write!(f, "Invalid `{}` in {}: {}", field, path.display(), reason)
      }
      ConfigError::ProjectNotFound { name, path } => {
        write!(f, "Project '{}' does not exist: {}", name, path.display())
      }
      ConfigError::MissingTemplate { name, path } => {
        write!(f, "No spec template for '{}': {}", name, path.display())
      }
      ConfigError::MissingVersion { name } => {
        write!(f, "Could not determine a version for '{}'", name)
      }
      ConfigError::MissingTarball { name, candidates } => {
        write!(f, "No tarball found for '{}'. Tried:", name)?;
        for path in candidates {
          write!(f, "\n  {}", path.display())?;
        }
        Ok(())
      }
    }
  }
}

/// External command errors
#[derive(Debug)]
pub enum CommandError {
  /// The program could not be started
  Spawn { command: String, reason: String },

  /// The program exited unsuccessfully
  Failed {
    step: String,
    command: String,
    code: Option<i32>,
    stderr: String,
  },
}

impl CommandError {
  fn help_message(&self) -> Option<String> {
    match self {
      CommandError::Spawn { command, .. } => {
        let program = command.split_whitespace().next().unwrap_or(command);
        Some(format!(
          "Make sure `{}` is installed and on PATH, or point the [tools] section of the config at it.",
          program
        ))
      }
      CommandError::Failed { .. } => None,
    }
  }
}

impl fmt::Display for CommandError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CommandError::Spawn { command, reason } => {
        write!(f, "Failed to start `{}`: {}", command, reason)
      }
      CommandError::Failed {
        step,
        command,
        code,
        stderr,
      } => {
        match code {
          Some(code) => write!(f, "{} failed: `{}` exited with status {}", step, command, code)?,
          None => write!(f, "{} failed: `{}` was terminated by a signal", step, command)?,
        }
        if !stderr.trim().is_empty() {
          write!(f, "\n{}", stderr.trim_end())?;
        }
        Ok(())
      }
    }
  }
}

/// Artifact publication errors
#[derive(Debug)]
pub enum PublishError {
  /// Some artifacts could not be copied into the repository tree
  CopyFailed { dest: PathBuf, failures: Vec<(PathBuf, String)> },
}

impl fmt::Display for PublishError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PublishError::CopyFailed { dest, failures } => {
        write!(f, "Failed to publish {} artifact(s) into {}:", failures.len(), dest.display())?;
        for (path, reason) in failures {
          write!(f, "\n  {}: {}", path.display(), reason)?;
        }
        Ok(())
      }
    }
  }
}

/// Result type alias for acb
pub type AcbResult<T> = Result<T, AcbError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> AcbResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> AcbResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<AcbError>,
{
  fn context(self, ctx: impl Into<String>) -> AcbResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> AcbResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &AcbError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
