//! Service layer for starting tasks and persisting their lifecycle changes.

use crate::error::{Cancelled, Classify, ErrorClass};
use crate::task::{
    domain::{NewTask, StepResult, Task, TaskDomainError, TaskId, TaskMetadata, TaskStatus},
    ports::{TaskStore, TaskStoreError},
};
use crate::workspace::domain::WorkspaceName;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::state_machine::{LifecycleStateMachine, TransitionError};

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// The operation was cancelled.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl From<TransitionError> for TaskLifecycleError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::Cancelled(cancelled) => Self::Cancelled(cancelled),
            TransitionError::Domain(domain) => Self::Domain(domain),
        }
    }
}

impl Classify for TaskLifecycleError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Domain(TaskDomainError::InvalidStateTransition { .. }) => {
                ErrorClass::InvalidTransition
            }
            Self::Domain(_) => ErrorClass::InvalidArgument,
            Self::Store(err) => err.class(),
            Self::Cancelled(err) => err.class(),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<R>,
    clock: Arc<C>,
    machine: LifecycleStateMachine<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(store: Arc<R>, clock: Arc<C>) -> Self {
        let machine = LifecycleStateMachine::new(Arc::clone(&clock));
        Self {
            store,
            clock,
            machine,
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<R> {
        &self.store
    }

    /// Returns the state machine used for status changes.
    #[must_use]
    pub const fn machine(&self) -> &LifecycleStateMachine<C> {
        &self.machine
    }

    /// Creates and persists a running task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for an empty plan and
    /// [`TaskLifecycleError::Store`] when persistence fails.
    #[instrument(skip_all, fields(workspace = %request.workspace))]
    pub async fn start_task(&self, request: NewTask) -> TaskLifecycleResult<Task> {
        let task = Task::new(request, &*self.clock)?;
        self.store.create(&task).await?;
        info!(task_id = %task.id(), "task started");
        Ok(task)
    }

    /// Loads a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the task cannot be read.
    pub async fn get(&self, workspace: &WorkspaceName, id: TaskId) -> TaskLifecycleResult<Task> {
        Ok(self.store.get(workspace, id).await?)
    }

    /// Applies a status change to `task` and persists it.
    ///
    /// Nothing is written when the transition is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Cancelled`], an invalid-transition
    /// [`TaskLifecycleError::Domain`] error, or a store error.
    #[instrument(skip_all, fields(task_id = %task.id(), to = %target))]
    pub async fn transition(
        &self,
        cancel: &CancellationToken,
        task: &mut Task,
        target: TaskStatus,
        reason: &str,
    ) -> TaskLifecycleResult<()> {
        let mut updated = task.clone();
        self.machine.transition(cancel, &mut updated, target, reason)?;
        self.store.update(&updated).await?;
        *task = updated;
        Ok(())
    }

    /// Appends a step result to the task history and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for an out-of-range step and
    /// [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn record_step_result(
        &self,
        task: &mut Task,
        result: StepResult,
    ) -> TaskLifecycleResult<()> {
        let mut updated = task.clone();
        updated.record_step_result(result, &*self.clock)?;
        self.store.update(&updated).await?;
        *task = updated;
        Ok(())
    }

    /// Applies `update` to the task metadata and persists it.
    ///
    /// The status is never changed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persistence fails; the
    /// caller's task is left unchanged in that case.
    pub async fn update_metadata(
        &self,
        task: &mut Task,
        update: impl FnOnce(&mut TaskMetadata) + Send,
    ) -> TaskLifecycleResult<()> {
        let mut updated = task.clone();
        updated.update_metadata(&*self.clock, update);
        self.store.update(&updated).await?;
        *task = updated;
        Ok(())
    }

    /// Appends a timestamped line to the task log.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the log cannot be written.
    pub async fn append_log(&self, task: &Task, line: &str) -> TaskLifecycleResult<()> {
        let entry = format!("{} {line}\n", self.clock.utc().to_rfc3339());
        self.store
            .append_log(task.workspace(), task.id(), entry.as_bytes())
            .await?;
        Ok(())
    }
}
