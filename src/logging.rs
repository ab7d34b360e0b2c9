use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter used by [`init`]. `RUST_LOG` wins when it is set.
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose))
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("authscope=debug")
    } else {
        EnvFilter::new("authscope=info")
    }
}

/// Install the global fmt subscriber. Anomaly diagnostics are only visible
/// with `verbose` (or a matching `RUST_LOG`).
pub fn init(verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}
