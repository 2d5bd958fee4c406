//! Persistence port for workspace records.

use crate::error::{Classify, ErrorClass};
use crate::workspace::domain::{Workspace, WorkspaceName};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workspace store operations.
pub type WorkspaceStoreResult<T> = Result<T, WorkspaceStoreError>;

/// Workspace persistence contract.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Returns every workspace, ordered by name.
    async fn list(&self) -> WorkspaceStoreResult<Vec<Workspace>>;

    /// Finds a workspace by name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceStoreError::NotFound`] when no such workspace exists.
    async fn get(&self, name: &WorkspaceName) -> WorkspaceStoreResult<Workspace>;

    /// Stores a new workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceStoreError::Duplicate`] when the name is taken.
    async fn create(&self, workspace: &Workspace) -> WorkspaceStoreResult<()>;

    /// Persists changes to an existing workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceStoreError::NotFound`] when the workspace does not
    /// exist.
    async fn update(&self, workspace: &Workspace) -> WorkspaceStoreResult<()>;

    /// Removes a workspace record.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceStoreError::NotFound`] when the workspace does not
    /// exist.
    async fn delete(&self, name: &WorkspaceName) -> WorkspaceStoreResult<()>;
}

/// Errors returned by workspace store implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceStoreError {
    /// A workspace with the same name already exists.
    #[error("workspace already exists: {0}")]
    Duplicate(WorkspaceName),

    /// The workspace was not found.
    #[error("workspace not found: {0}")]
    NotFound(WorkspaceName),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkspaceStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns whether the error reports a missing workspace.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Classify for WorkspaceStoreError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Duplicate(_) => ErrorClass::InvalidArgument,
            Self::Persistence(_) => ErrorClass::Internal,
        }
    }
}
