mod commands;
mod core;
mod logging;
mod release;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use core::context::Context;
use core::error::{AcbError, print_error};
use core::runner::SystemRunner;
use std::path::PathBuf;
use ui::StepReporter;

/// Clean, update, build and package local source checkouts
#[derive(Parser)]
#[command(name = "acb")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Configuration file (default: $ACB_CONFIG, then the user config directory)
  #[arg(long, global = true, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Show debug logging on stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run clean/update/make/build for projects
  Run(commands::RunArgs),

  /// Show what acb knows about projects, without running anything
  Status {
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
    /// Projects to show (default: every checkout under the code root)
    projects: Vec<String>,
  },

  /// Write a default configuration and create the working directories
  Init {
    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  let heading = anstyle::Style::new()
    .bold()
    .underline()
    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)));
  let failure = anstyle::Style::new()
    .bold()
    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red)));

  clap::builder::Styles::styled()
    .usage(heading)
    .header(heading)
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(failure)
    .error(failure)
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  logging::init(cli.verbose);

  // init runs before any config exists
  if let Commands::Init { force } = cli.command {
    if let Err(err) = commands::run_init(cli.config.as_deref(), force) {
      handle_error(err);
    }
    return;
  }

  let ctx = match Context::load(cli.config.as_deref()) {
    Ok(ctx) => ctx,
    Err(err) => handle_error(err),
  };

  let result = match cli.command {
    Commands::Run(args) => commands::run_projects(&ctx, &SystemRunner, StepReporter::new(), args),
    Commands::Status { json, projects } => commands::run_status(&ctx, json, projects),
    Commands::Init { .. } => Ok(()),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: AcbError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
