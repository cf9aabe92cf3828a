//! Logging infrastructure for Stint.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for a binary.
///
/// `RUST_LOG` overrides `default_level` (debug, info, warn, error). Output
/// uses the compact fmt layer.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}
