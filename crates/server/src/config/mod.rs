mod executor;
mod provider;
mod server;
mod state;
mod telemetry;

#[cfg(test)]
mod tests;

pub use executor::*;
pub use provider::*;
pub use server::*;
pub use state::*;
pub use telemetry::*;

use serde::Deserialize;

/// Top-level configuration for the AutoReact server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct AutoReactConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Settings store backend configuration.
    #[serde(default)]
    pub state: StateConfig,
    /// Queue, retry and worker tuning.
    #[serde(default)]
    pub executor: ExecutorSection,
    /// Reaction provider configuration.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Admin command behavior.
    #[serde(default)]
    pub commands: CommandsConfig,
    /// Log output configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Admin command configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CommandsConfig {
    /// Whether `set ratelimit` may change a group's pacing delay.
    ///
    /// Locked by default.
    #[serde(default)]
    pub allow_ratelimit_tuning: bool,
}
