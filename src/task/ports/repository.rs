//! Store port for task records, logs and artifacts.

use crate::error::{Classify, ErrorClass};
use crate::task::domain::{Task, TaskId};
use crate::workspace::domain::WorkspaceName;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Tasks are keyed by `(workspace, id)`. Each task additionally owns an
/// append-only log stream and a set of named artifacts.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Duplicate`] when the task already exists.
    async fn create(&self, task: &Task) -> TaskStoreResult<()>;

    /// Finds a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::TaskNotFound`] when the task does not exist.
    async fn get(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<Task>;

    /// Lists a workspace's tasks, most recently created first.
    async fn list(&self, workspace: &WorkspaceName) -> TaskStoreResult<Vec<Task>>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::TaskNotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskStoreResult<()>;

    /// Removes a task together with its log and artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::TaskNotFound`] when the task does not exist.
    async fn delete(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<()>;

    /// Appends raw bytes to the task log.
    async fn append_log(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        bytes: &[u8],
    ) -> TaskStoreResult<()>;

    /// Reads the whole task log; a task without log output yields no bytes.
    async fn read_log(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<Vec<u8>>;

    /// Writes (or replaces) a named artifact.
    async fn save_artifact(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        name: &str,
        bytes: &[u8],
    ) -> TaskStoreResult<()>;

    /// Reads a named artifact.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::ArtifactNotFound`] when no such artifact
    /// exists.
    async fn get_artifact(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        name: &str,
    ) -> TaskStoreResult<Vec<u8>>;

    /// Lists artifact names in sorted order.
    async fn list_artifacts(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
    ) -> TaskStoreResult<Vec<String>>;

    /// Stores an artifact under a newly allocated versioned name and returns
    /// that name.
    ///
    /// `validation.json` is stored as `validation.1.json`, then
    /// `validation.2.json`, and so on; existing versions are never replaced.
    async fn save_versioned_artifact(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        name: &str,
        bytes: &[u8],
    ) -> TaskStoreResult<String>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("task {id} already exists in workspace {workspace}")]
    Duplicate {
        /// Owning workspace.
        workspace: WorkspaceName,
        /// Task identifier.
        id: TaskId,
    },

    /// The task was not found.
    #[error("task {id} not found in workspace {workspace}")]
    TaskNotFound {
        /// Owning workspace.
        workspace: WorkspaceName,
        /// Task identifier.
        id: TaskId,
    },

    /// The artifact was not found.
    #[error("artifact '{name}' not found for task {id}")]
    ArtifactNotFound {
        /// Task identifier.
        id: TaskId,
        /// Artifact file name.
        name: String,
    },

    /// The artifact name is not a plain file name.
    #[error("invalid artifact name '{0}'")]
    InvalidArtifactName(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns whether the error reports a missing task or artifact.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound { .. } | Self::ArtifactNotFound { .. })
    }
}

impl Classify for TaskStoreError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::TaskNotFound { .. } | Self::ArtifactNotFound { .. } => ErrorClass::NotFound,
            Self::Duplicate { .. } | Self::InvalidArtifactName(_) => ErrorClass::InvalidArgument,
            Self::Persistence(_) => ErrorClass::Internal,
        }
    }
}

/// Splits an artifact name into stem and extension for versioning.
///
/// `validation.json` becomes `("validation", Some("json"))`; a name without an
/// extension keeps the whole name as the stem.
#[must_use]
pub fn split_artifact_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// Builds the versioned artifact name for `version`.
#[must_use]
pub fn versioned_artifact_name(name: &str, version: u32) -> String {
    match split_artifact_name(name) {
        (stem, Some(ext)) => format!("{stem}.{version}.{ext}"),
        (stem, None) => format!("{stem}.{version}"),
    }
}
