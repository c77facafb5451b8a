use serde::Deserialize;

/// Output style of the log formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Log output configuration.
///
/// Filtering is controlled by `RUST_LOG` (default `info`).
#[derive(Debug, Default, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub format: LogFormat,
}
