// Application state (AppState)

use crate::core::config::{Config, StoreBackend};
use crate::repository::StudentRepository;
use crate::stores::{memory::MemoryStore, rest::RestStore, StudentStore};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Shared application state
///
/// Handed to every request handler behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub repository: StudentRepository,

    pub config: Arc<Config>,
}

impl AppState {
    /// Build state with the store selected by `config.store.backend`.
    pub fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn StudentStore> = match config.store.backend {
            StoreBackend::Rest => Arc::new(
                RestStore::new(
                    &config.store.url,
                    &config.store.table,
                    config.store.api_key.clone(),
                    config.store.timeout(),
                )
                .context("Failed to create store client")?,
            ),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn StudentStore>) -> Self {
        Self {
            repository: StudentRepository::new(store),
            config: Arc::new(config),
        }
    }
}
