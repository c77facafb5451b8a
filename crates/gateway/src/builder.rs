use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use autoreact_executor::{ExecutorConfig, Notifications, ReactionProcessor};
use autoreact_provider::{DynNotifier, DynReactionProvider};
use autoreact_state::SettingsStore;

use crate::error::GatewayError;
use crate::gateway::ReactionGateway;

/// Fluent builder for constructing a [`ReactionGateway`].
///
/// A settings store, a reaction provider, and a notifier must be supplied.
/// The executor configuration defaults to [`ExecutorConfig::default`].
#[derive(Default)]
pub struct GatewayBuilder {
    store: Option<Arc<dyn SettingsStore>>,
    provider: Option<Arc<dyn DynReactionProvider>>,
    notifier: Option<Arc<dyn DynNotifier>>,
    config: ExecutorConfig,
}

impl GatewayBuilder {
    /// Create a new builder with all optional fields set to their defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the settings store implementation.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the provider used to add reactions.
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn DynReactionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the notifier used for group notices.
    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn DynNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the executor configuration (queue capacity, backoff, cooldowns).
    #[must_use]
    pub fn executor_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Consume the builder and produce a configured [`ReactionGateway`].
    ///
    /// Returns [`GatewayError::Configuration`] if a required component is
    /// missing or the queue capacity is zero.
    pub fn build(self) -> Result<ReactionGateway, GatewayError> {
        let store = self
            .store
            .ok_or_else(|| GatewayError::Configuration("settings store is required".into()))?;
        let provider = self
            .provider
            .ok_or_else(|| GatewayError::Configuration("reaction provider is required".into()))?;
        let notifier = self
            .notifier
            .ok_or_else(|| GatewayError::Configuration("notifier is required".into()))?;
        if self.config.queue_capacity == 0 {
            return Err(GatewayError::Configuration(
                "queue capacity must be at least 1".into(),
            ));
        }

        let notifications = Notifications::new(Arc::clone(&store), notifier);
        let processor = ReactionProcessor::new(
            self.config.clone(),
            Arc::clone(&store),
            provider,
            notifications.clone(),
        );

        Ok(ReactionGateway {
            config: self.config,
            store,
            processor: Arc::new(processor),
            notifications,
            lanes: DashMap::new(),
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
        })
    }
}
