// SPDX-License-Identifier: BUSL-1.1
//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{Datastore, MemoryStore};

/// Cloned per request; clones share the same datastore handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Datastore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Default configuration over a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn Datastore>) -> Self {
        Self::with_config(AppConfig::default(), store)
    }

    pub fn with_config(config: AppConfig, store: Arc<dyn Datastore>) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.store.backend())
            .field("config", &self.config)
            .finish()
    }
}
