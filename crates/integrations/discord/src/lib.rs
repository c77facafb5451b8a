//! Discord provider for the AutoReact pipeline.
//!
//! [`DiscordClient`] implements both
//! [`ReactionProvider`](autoreact_provider::ReactionProvider) and
//! [`Notifier`](autoreact_provider::Notifier) on top of the
//! [Discord REST API](https://discord.com/developers/docs/reference), using a
//! bot token.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use autoreact_discord::{DiscordClient, DiscordConfig};
//!
//! let config = DiscordConfig::new("bot-token");
//! let client = DiscordClient::new(config).expect("valid HTTP client");
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::DiscordClient;
pub use config::DiscordConfig;
pub use error::DiscordError;
