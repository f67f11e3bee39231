//! Tracing setup for the runtime binary.

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber.
///
/// `RUST_LOG` wins over the configured default filter. Safe to call more
/// than once; subsequent calls are no-ops.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
