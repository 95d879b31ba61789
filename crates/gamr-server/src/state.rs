use std::sync::Arc;

use crate::config::ServerConfig;
use crate::store::{GameStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub store: GameStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Open the configured store and wrap it with the config.
    pub fn new(config: ServerConfig) -> Result<Self, StoreError> {
        let store = GameStore::open(&config.database_url)?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: ServerConfig, store: GameStore) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
