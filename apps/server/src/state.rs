//! Shared application state

use crate::{
    config::{Config, SearchBackendKind},
    db::{
        EventChannel, HttpSearchBackend, KeyValueStore, LogEventChannel, MemoryKeyValueStore,
        MemorySearchBackend, PlanRepository, SearchBackend,
    },
    services::{EventNotifier, PlanOrchestrator, SearchProjector},
    Error, Result,
};
use planvault_schema::SchemaValidator;
use std::sync::Arc;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<PlanOrchestrator>,
}

impl AppState {
    /// Initialize the application state, wiring backends from configuration.
    pub async fn new(config: Config) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());

        let search: Arc<dyn SearchBackend> = match config.search.backend {
            SearchBackendKind::Http => Arc::new(
                HttpSearchBackend::new(&config.search.url)
                    .map_err(|e| Error::Internal(e.to_string()))?,
            ),
            SearchBackendKind::Memory => Arc::new(MemorySearchBackend::new()),
        };

        let channel: Arc<dyn EventChannel> = Arc::new(LogEventChannel);

        Self::with_backends(config, kv, search, channel).await
    }

    /// Wire the state over explicit backends. Used by `new` and by tests that
    /// substitute in-memory fakes.
    pub async fn with_backends(
        config: Config,
        kv: Arc<dyn KeyValueStore>,
        search: Arc<dyn SearchBackend>,
        channel: Arc<dyn EventChannel>,
    ) -> Result<Self> {
        crate::startup::ensure_search_index(search.as_ref(), &config.search.index).await?;

        let repository = PlanRepository::new(kv);
        let projector = SearchProjector::new(search, config.search.index.clone());
        let notifier = EventNotifier::spawn(channel, config.broker.event_queue_capacity);

        let orchestrator = Arc::new(PlanOrchestrator::new(
            repository,
            projector,
            notifier,
            Arc::new(SchemaValidator),
        ));

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            orchestrator,
        })
    }
}
