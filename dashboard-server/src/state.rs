//! Process-lifetime application state.
//!
//! Built once at startup and handed to every request task through axum's
//! `State` extractor; nothing here lives in a global.

use std::sync::Arc;

use storage::{AggregateComputer, MessageStore, StorageError};

use crate::config::ServerConfig;
use crate::ingest::EventIngestor;
use crate::query::QueryService;
use crate::registry::SubscriberRegistry;

#[derive(Clone)]
pub struct AppState {
    pub store: MessageStore,
    pub aggregates: AggregateComputer,
    pub registry: Arc<SubscriberRegistry>,
    pub ingestor: EventIngestor,
    pub query: QueryService,
}

impl AppState {
    pub async fn new(config: &ServerConfig) -> Result<Self, StorageError> {
        Self::with_database(&config.database_url).await
    }

    /// Builds the full component graph on top of one store. Also used by
    /// tests against `sqlite::memory:`.
    pub async fn with_database(database_url: &str) -> Result<Self, StorageError> {
        let store = MessageStore::new(database_url).await?;
        let aggregates = AggregateComputer::new(store.clone());
        let registry = Arc::new(SubscriberRegistry::new());
        let ingestor = EventIngestor::new(store.clone(), aggregates.clone(), registry.clone());
        let query = QueryService::new(store.clone(), aggregates.clone());

        Ok(Self {
            store,
            aggregates,
            registry,
            ingestor,
            query,
        })
    }
}
