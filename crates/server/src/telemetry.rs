//! Tracing subscriber initialization.
//!
//! Installs a [`tracing_subscriber`] registry with an `EnvFilter` read from
//! `RUST_LOG` (default `info`) and a `fmt` layer in the configured style.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogFormat, TelemetryConfig};

/// Build the default filter: `RUST_LOG` if set, otherwise `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber.
///
/// Must be called once, before any tracing calls.
pub fn init(config: &TelemetryConfig) {
    let registry = tracing_subscriber::registry().with(env_filter());

    match config.format {
        LogFormat::Compact => registry.with(fmt::layer().compact()).init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}
