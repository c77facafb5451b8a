pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod provider_factory;
pub mod state_factory;
pub mod telemetry;
