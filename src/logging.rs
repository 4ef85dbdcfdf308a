//! Tracing initialization.
//!
//! Diagnostics go to stderr through a compact `tracing-subscriber` layer so they
//! never interleave with the activity log on stdout. `RUST_LOG`, when set, wins
//! over the configured filter.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when the configured one does not parse.
pub const FALLBACK_FILTER: &str = "warn";

/// Picks the filter directive from CLI flags and configuration.
///
/// An explicit `--log-level` wins, then each `-v` raises verbosity one step
/// above the default, and finally the configured level applies.
pub fn effective_filter(explicit: Option<&str>, verbose: u8, configured: &str) -> String {
    if let Some(level) = explicit {
        return level.to_string();
    }
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(directive: &str) {
    let stderr_layer = tsfmt::layer()
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_target(true)
        .compact();

    let _ = registry()
        .with(env_filter(directive))
        .with(stderr_layer)
        .try_init();
}
