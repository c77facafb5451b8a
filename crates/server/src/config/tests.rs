use std::time::Duration;

use autoreact_executor::RetryStrategy;

use super::*;

#[test]
fn empty_file_uses_defaults() {
    let config: AutoReactConfig = toml::from_str("").unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.shutdown_timeout_seconds, 30);
    assert_eq!(config.state.backend, "memory");
    assert!(config.state.path.is_none());
    assert_eq!(config.provider.provider_type, "log");
    assert_eq!(config.provider.api_base, "https://discord.com/api/v10");
    assert_eq!(config.provider.token_env, "DISCORD_BOT_TOKEN");
    assert_eq!(config.provider.request_timeout_seconds, 15);
    assert!(!config.commands.allow_ratelimit_tuning);
    assert_eq!(config.telemetry.format, LogFormat::Compact);
}

#[test]
fn executor_defaults_match_runtime_defaults() {
    let config: AutoReactConfig = toml::from_str("").unwrap();
    let exec = config.executor.to_executor_config();
    assert_eq!(exec.queue_capacity, 1000);
    assert_eq!(exec.retry_strategy, RetryStrategy::default());
    assert_eq!(exec.permission_warn_cooldown, Duration::from_secs(60));
    assert_eq!(exec.fault_pause, Duration::from_secs(1));
}

#[test]
fn full_config() {
    let toml = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [state]
        backend = "file"
        path = "/var/lib/autoreact/settings.json"

        [executor]
        queue_capacity = 50
        retry_initial_ms = 200
        retry_step_ms = 300

        [provider]
        type = "discord"
        token_env = "MY_TOKEN"

        [commands]
        allow_ratelimit_tuning = true

        [telemetry]
        format = "json"
    "#;

    let config: AutoReactConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.shutdown_timeout_seconds, 30);
    assert_eq!(config.state.backend, "file");
    assert_eq!(
        config.state.path.as_deref(),
        Some("/var/lib/autoreact/settings.json")
    );
    assert_eq!(config.provider.provider_type, "discord");
    assert_eq!(config.provider.token_env, "MY_TOKEN");
    assert!(config.commands.allow_ratelimit_tuning);
    assert_eq!(config.telemetry.format, LogFormat::Json);

    let exec = config.executor.to_executor_config();
    assert_eq!(exec.queue_capacity, 50);
    assert_eq!(exec.retry_strategy.delay_for(0), Duration::from_millis(200));
    assert_eq!(exec.retry_strategy.delay_for(2), Duration::from_millis(800));
}

#[test]
fn unknown_log_format_is_rejected() {
    let result: Result<AutoReactConfig, _> = toml::from_str("[telemetry]\nformat = \"xml\"");
    assert!(result.is_err());
}
