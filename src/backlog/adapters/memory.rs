//! In-memory backlog store.

use crate::backlog::{
    domain::{Discovery, DiscoveryId},
    ports::{BacklogResult, BacklogStore, BacklogStoreError},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory backlog store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBacklogStore {
    state: Arc<RwLock<BTreeMap<DiscoveryId, Discovery>>>,
}

impl InMemoryBacklogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> BacklogStoreError {
    BacklogStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl BacklogStore for InMemoryBacklogStore {
    async fn get(&self, id: &DiscoveryId) -> BacklogResult<Discovery> {
        self.state
            .read()
            .map_err(lock_error)?
            .get(id)
            .cloned()
            .ok_or_else(|| BacklogStoreError::NotFound(id.clone()))
    }

    async fn save(&self, discovery: &Discovery) -> BacklogResult<()> {
        self.state
            .write()
            .map_err(lock_error)?
            .insert(discovery.id().clone(), discovery.clone());
        Ok(())
    }
}
