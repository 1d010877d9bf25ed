//! Log output for the binary.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Route `log` records from the libraries to stderr.
///
/// The filter comes from `RUST_LOG`, falling back to warnings only.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // Fails only when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
