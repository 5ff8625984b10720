//! Tracing setup for the routine service and CLI.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging at INFO, overridable with RUST_LOG
pub fn init() {
  init_with_level("info")
}

/// Initialize logging with a specific default level
///
/// RUST_LOG still takes precedence when set. Output goes to stderr so stdout
/// carries only the routine JSON.
pub fn init_with_level(default_level: &str) {
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  // A second init (tests, embedding hosts) keeps the first subscriber
  let _ = tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().compact().with_writer(std::io::stderr))
    .try_init();
}

/// Capture logs in the test harness output
#[cfg(test)]
pub fn init_test() {
  let _ = tracing_subscriber::fmt()
    .with_test_writer()
    .with_env_filter(EnvFilter::new("debug"))
    .try_init();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_repeated_init_keeps_first_subscriber() {
    init_with_level("debug");
    init();
    init_test();
    tracing::info!("logging initialized");
  }
}
