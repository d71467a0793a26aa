//! Installation du collecteur de traces.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Installe le collecteur `fmt` ; `RUST_LOG` prime sur `default_level`.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("Invalid log level {default_level}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Cannot install log subscriber: {e}"))
}
