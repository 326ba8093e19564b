//! Diagnostic logging setup
//!
//! Progress markers go to stdout; everything logged through `tracing` goes to
//! stderr. `RUST_LOG` takes precedence over the `-v` flag.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Verbosity picked from the command line
pub fn level_for(verbose: bool) -> Level {
  if verbose { Level::DEBUG } else { Level::WARN }
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool) {
  let level = level_for(verbose);
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

  tracing_subscriber::registry()
    .with(filter)
    .with(
      fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr),
    )
    .try_init()
    .ok();
}
