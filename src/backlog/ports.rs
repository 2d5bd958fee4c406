//! Store port for backlog discoveries.

use super::domain::{BacklogDomainError, Discovery, DiscoveryId};
use crate::error::{Classify, ErrorClass};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for backlog store operations.
pub type BacklogResult<T> = Result<T, BacklogStoreError>;

/// Errors returned by backlog stores.
#[derive(Debug, Clone, Error)]
pub enum BacklogStoreError {
    /// No discovery with this identifier exists.
    #[error("discovery {0} not found")]
    NotFound(DiscoveryId),
    /// The discovery rejected the change.
    #[error(transparent)]
    Domain(#[from] BacklogDomainError),
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BacklogStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Classify for BacklogStoreError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Domain(_) => ErrorClass::InvalidArgument,
            Self::Persistence(_) => ErrorClass::Internal,
        }
    }
}

/// Discovery persistence contract.
#[async_trait]
pub trait BacklogStore: Send + Sync {
    /// Finds a discovery.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogStoreError::NotFound`] when it does not exist.
    async fn get(&self, id: &DiscoveryId) -> BacklogResult<Discovery>;

    /// Inserts or replaces a discovery.
    async fn save(&self, discovery: &Discovery) -> BacklogResult<()>;

    /// Marks a discovery completed by `task`.
    ///
    /// Completing an already completed discovery succeeds without writing.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogStoreError::NotFound`] for an unknown discovery and
    /// [`BacklogStoreError::Domain`] for a dismissed one.
    async fn complete(
        &self,
        id: &DiscoveryId,
        task: TaskId,
        at: DateTime<Utc>,
    ) -> BacklogResult<Discovery> {
        let mut discovery = self.get(id).await?;
        if discovery.complete(task, at)? {
            self.save(&discovery).await?;
        }
        Ok(discovery)
    }
}
