//! In-memory workspace store for tests and embedding.

use crate::workspace::{
    domain::{Workspace, WorkspaceName},
    ports::{WorkspaceStore, WorkspaceStoreError, WorkspaceStoreResult},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory workspace store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspaceStore {
    state: Arc<RwLock<BTreeMap<WorkspaceName, Workspace>>>,
}

impl InMemoryWorkspaceStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> WorkspaceStoreResult<RwLockReadGuard<'_, BTreeMap<WorkspaceName, Workspace>>> {
        self.state.read().map_err(|err| {
            WorkspaceStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
    ) -> WorkspaceStoreResult<RwLockWriteGuard<'_, BTreeMap<WorkspaceName, Workspace>>> {
        self.state.write().map_err(|err| {
            WorkspaceStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl WorkspaceStore for InMemoryWorkspaceStore {
    async fn list(&self) -> WorkspaceStoreResult<Vec<Workspace>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn get(&self, name: &WorkspaceName) -> WorkspaceStoreResult<Workspace> {
        self.read()?
            .get(name)
            .cloned()
            .ok_or_else(|| WorkspaceStoreError::NotFound(name.clone()))
    }

    async fn create(&self, workspace: &Workspace) -> WorkspaceStoreResult<()> {
        let mut state = self.write()?;
        if state.contains_key(workspace.name()) {
            return Err(WorkspaceStoreError::Duplicate(workspace.name().clone()));
        }
        state.insert(workspace.name().clone(), workspace.clone());
        Ok(())
    }

    async fn update(&self, workspace: &Workspace) -> WorkspaceStoreResult<()> {
        let mut state = self.write()?;
        let slot = state
            .get_mut(workspace.name())
            .ok_or_else(|| WorkspaceStoreError::NotFound(workspace.name().clone()))?;
        *slot = workspace.clone();
        Ok(())
    }

    async fn delete(&self, name: &WorkspaceName) -> WorkspaceStoreResult<()> {
        self.write()?
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| WorkspaceStoreError::NotFound(name.clone()))
    }
}
