//! Progress markers for pipeline steps
//!
//! Each step prints `<Title> <project>...` when it starts and a tab-separated
//! `Done`/`Failed` marker when it ends, so a long batch reads as one line per
//! step on stdout. Diagnostics go through `tracing` on stderr instead.

use std::io::{self, Write};

/// Prints step start and completion markers
#[derive(Debug, Clone, Copy, Default)]
pub struct StepReporter {
  quiet: bool,
}

impl StepReporter {
  pub fn new() -> Self {
    Self { quiet: false }
  }

  /// A reporter that prints nothing
  pub fn quiet() -> Self {
    Self { quiet: true }
  }

  /// Announce the start of a step
  pub fn start(&self, title: &str, project: &str) {
    if self.quiet {
      return;
    }
    print!("{} {}...", title, project);
    let _ = io::stdout().flush();
  }

  /// Mark the current step as finished
  pub fn done(&self) {
    self.finish("Done");
  }

  /// Mark the current step as failed
  pub fn failed(&self) {
    self.finish("Failed");
  }

  /// Finish a step by printing its (informational) output instead of `Done`
  pub fn show(&self, text: &str, empty_message: &str) {
    if self.quiet {
      return;
    }
    let text = text.trim_end();
    if text.is_empty() {
      println!("\t{}", empty_message);
    } else {
      println!("\n{}", text);
    }
  }

  /// A standalone message not tied to a step
  pub fn note(&self, message: &str) {
    if !self.quiet {
      println!("{}", message);
    }
  }

  fn finish(&self, marker: &str) {
    if !self.quiet {
      println!("\t{}", marker);
    }
  }
}
