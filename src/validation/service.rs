//! Runs the validation pipeline for a task and records the verdict.

use super::domain::{PipelineResult, VALIDATION_ARTIFACT};
use super::ports::{ValidationRunner, ValidationRunnerError};
use crate::error::{Cancelled, Classify, ErrorClass};
use crate::task::{
    domain::{Task, TaskDomainError, TaskStatus},
    ports::{TaskStore, TaskStoreError},
    services::{TaskLifecycleError, TaskLifecycleService},
};
use crate::workspace::domain::{Workspace, WorkspaceName};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Errors returned by [`ValidationService::validate`].
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The workspace has no worktree to validate.
    #[error("workspace '{0}' has no worktree")]
    MissingWorktree(WorkspaceName),
    /// The task is not in a status that can be validated.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The pipeline could not run.
    #[error(transparent)]
    Runner(#[from] ValidationRunnerError),
    /// Results could not be encoded.
    #[error("failed to encode validation results: {0}")]
    Encode(Arc<serde_json::Error>),
    /// Artifact persistence failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// The status change failed.
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),
}

impl Classify for ValidationError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::MissingWorktree(_) => ErrorClass::InvalidArgument,
            Self::Domain(TaskDomainError::InvalidStateTransition { .. }) => {
                ErrorClass::InvalidTransition
            }
            Self::Domain(_) => ErrorClass::InvalidArgument,
            Self::Runner(err) => err.class(),
            Self::Encode(_) => ErrorClass::Internal,
            Self::Store(err) => err.class(),
            Self::Lifecycle(err) => err.class(),
        }
    }
}

/// What a validation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Pipeline result.
    pub result: PipelineResult,
    /// Name of the versioned artifact holding the result.
    pub artifact: String,
}

/// Validates running tasks.
#[derive(Clone)]
pub struct ValidationService<T, V, C>
where
    T: TaskStore,
    V: ValidationRunner,
    C: Clock + Send + Sync,
{
    lifecycle: TaskLifecycleService<T, C>,
    runner: Arc<V>,
}

impl<T, V, C> ValidationService<T, V, C>
where
    T: TaskStore,
    V: ValidationRunner,
    C: Clock + Send + Sync,
{
    /// Creates a validation service.
    #[must_use]
    pub const fn new(lifecycle: TaskLifecycleService<T, C>, runner: Arc<V>) -> Self {
        Self { lifecycle, runner }
    }

    /// Runs the pipeline in the workspace's worktree, stores the results and
    /// moves the task to `awaiting_approval` or `validation_failed`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the task cannot be validated, the
    /// pipeline cannot run, or results cannot be persisted.
    #[instrument(skip_all, fields(workspace = %workspace.name(), task_id = %task.id()))]
    pub async fn validate(
        &self,
        workspace: &Workspace,
        task: &mut Task,
        cancel: &CancellationToken,
    ) -> Result<ValidationOutcome, ValidationError> {
        if !task.status().can_transition_to(TaskStatus::AwaitingApproval) {
            return Err(TaskDomainError::InvalidStateTransition {
                from: task.status(),
                to: TaskStatus::AwaitingApproval,
            }
            .into());
        }
        let dir = workspace
            .worktree_path()
            .ok_or_else(|| ValidationError::MissingWorktree(workspace.name().clone()))?;
        if cancel.is_cancelled() {
            return Err(TaskLifecycleError::from(Cancelled).into());
        }

        let result = self.runner.run(cancel, dir).await?;
        let encoded = serde_json::to_vec_pretty(&result)
            .map_err(|err| ValidationError::Encode(Arc::new(err)))?;

        let store = self.lifecycle.store();
        let artifact = store
            .save_versioned_artifact(task.workspace(), task.id(), VALIDATION_ARTIFACT, &encoded)
            .await?;
        store
            .save_artifact(task.workspace(), task.id(), VALIDATION_ARTIFACT, &encoded)
            .await?;

        let (target, reason) = if result.success {
            (TaskStatus::AwaitingApproval, "Validation passed".to_owned())
        } else {
            (TaskStatus::ValidationFailed, result.summary())
        };
        self.lifecycle
            .transition(cancel, task, target, &reason)
            .await?;
        if let Err(err) = self
            .lifecycle
            .append_log(task, &format!("validation: {} ({artifact})", result.summary()))
            .await
        {
            warn!(error = %err, "failed to append validation log line");
        }
        info!(success = result.success, %artifact, "validation recorded");

        Ok(ValidationOutcome { result, artifact })
    }
}
