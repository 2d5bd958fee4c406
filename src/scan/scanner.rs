//! Sequential task scanner.

use crate::error::{Cancelled, Classify, ErrorClass};
use crate::task::{
    domain::{Task, TaskStatus},
    ports::TaskStore,
};
use crate::workspace::{
    domain::Workspace,
    ports::{WorkspaceStore, WorkspaceStoreError},
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// A workspace together with the task selected from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHit {
    /// Owning workspace.
    pub workspace: Workspace,
    /// Matching task.
    pub task: Task,
}

/// Errors returned by [`TaskScanner`].
#[derive(Debug, Error)]
pub enum ScanError {
    /// The token fired between workspaces.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    /// The workspace list itself could not be read.
    #[error("failed to list workspaces: {0}")]
    Workspaces(#[from] WorkspaceStoreError),
}

impl Classify for ScanError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Cancelled(_) => ErrorClass::Cancelled,
            Self::Workspaces(err) => err.class(),
        }
    }
}

/// Finds tasks across all workspaces.
#[derive(Clone)]
pub struct TaskScanner<W, T>
where
    W: WorkspaceStore,
    T: TaskStore,
{
    workspaces: Arc<W>,
    tasks: Arc<T>,
}

impl<W, T> TaskScanner<W, T>
where
    W: WorkspaceStore,
    T: TaskStore,
{
    /// Creates a scanner over the given stores.
    #[must_use]
    pub const fn new(workspaces: Arc<W>, tasks: Arc<T>) -> Self {
        Self { workspaces, tasks }
    }

    /// Returns at most one matching task per workspace.
    ///
    /// A workspace whose tasks cannot be listed is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Cancelled`] when `cancel` fires before the scan
    /// finishes and [`ScanError::Workspaces`] when the workspace list fails.
    #[instrument(skip_all)]
    pub async fn scan<P>(
        &self,
        cancel: &CancellationToken,
        predicate: P,
    ) -> Result<Vec<ScanHit>, ScanError>
    where
        P: Fn(&Task) -> bool + Send + Sync,
    {
        let workspaces = self.workspaces.list().await?;
        let mut hits = Vec::new();
        for workspace in workspaces {
            if cancel.is_cancelled() {
                return Err(Cancelled.into());
            }
            let tasks = match self.tasks.list(workspace.name()).await {
                Ok(tasks) => tasks,
                Err(err) => {
                    warn!(workspace = %workspace.name(), error = %err, "skipping workspace with unreadable tasks");
                    continue;
                }
            };
            if let Some(task) = tasks.into_iter().find(|task| predicate(task)) {
                debug!(workspace = %workspace.name(), task_id = %task.id(), "scan hit");
                hits.push(ScanHit { workspace, task });
            }
        }
        Ok(hits)
    }

    /// Finds tasks waiting for approval.
    ///
    /// # Errors
    ///
    /// See [`TaskScanner::scan`].
    pub async fn awaiting_approval(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScanHit>, ScanError> {
        self.scan(cancel, |task| task.status() == TaskStatus::AwaitingApproval)
            .await
    }

    /// Finds tasks in one of the error states.
    ///
    /// # Errors
    ///
    /// See [`TaskScanner::scan`].
    pub async fn in_error_state(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScanHit>, ScanError> {
        self.scan(cancel, |task| task.status().is_error()).await
    }

    /// Finds running tasks.
    ///
    /// # Errors
    ///
    /// See [`TaskScanner::scan`].
    pub async fn running(&self, cancel: &CancellationToken) -> Result<Vec<ScanHit>, ScanError> {
        self.scan(cancel, |task| task.status() == TaskStatus::Running)
            .await
    }
}
