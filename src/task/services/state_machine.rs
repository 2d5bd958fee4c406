//! Context-aware entry point to the task lifecycle state machine.

use crate::error::{Cancelled, Classify, ErrorClass};
use crate::task::domain::{Task, TaskDomainError, TaskStatus};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Errors returned by [`LifecycleStateMachine::transition`].
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The caller cancelled before the transition was applied.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    /// The current status cannot reach the target.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
}

/// Validates and applies task status changes.
///
/// The machine only mutates the in-memory task. Callers persist the result
/// explicitly, so discarding the task undoes the transition.
#[derive(Debug, Clone)]
pub struct LifecycleStateMachine<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
}

impl<C> LifecycleStateMachine<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a state machine stamping transitions with `clock`.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    /// Moves `task` to `target`, recording `reason`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Cancelled`] when `cancel` has fired and
    /// [`TransitionError::Domain`] when the transition is not permitted. The
    /// task is unchanged in both cases.
    pub fn transition(
        &self,
        cancel: &CancellationToken,
        task: &mut Task,
        target: TaskStatus,
        reason: &str,
    ) -> Result<(), TransitionError> {
        if cancel.is_cancelled() {
            return Err(Cancelled.into());
        }
        let from = task.status();
        task.transition_to(target, reason, &*self.clock)?;
        debug!(task_id = %task.id(), %from, to = %target, reason, "task transitioned");
        Ok(())
    }
}

impl Classify for TransitionError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Cancelled(_) => ErrorClass::Cancelled,
            Self::Domain(TaskDomainError::InvalidStateTransition { .. }) => {
                ErrorClass::InvalidTransition
            }
            Self::Domain(_) => ErrorClass::InvalidArgument,
        }
    }
}
