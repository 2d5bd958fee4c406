//! Executes recovery actions and drives the interactive recovery loop.

use super::action::RecoveryAction;
use super::instructions;
use super::step_approval::{approval_menu, pending_step_approval};
use crate::error::{Cancelled, Classify, ErrorClass};
use crate::interaction::{SelectError, Selector, UrlOpener};
use crate::scan::ScanHit;
use crate::task::{
    domain::{Task, TaskStatus, metadata_keys},
    ports::{TaskStore, TaskStoreError},
    services::{TaskLifecycleError, TaskLifecycleService},
};
use crate::validation::{PipelineResult, VALIDATION_ARTIFACT};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

const PUSH_CONFLICT_TYPES: [&str; 2] = ["non_fast_forward", "rejected"];

/// Errors returned by [`RecoveryService`].
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// Continue-waiting was requested for a task that did not time out.
    #[error("continue waiting requires a ci_timeout task, task is {status}")]
    ContinueRequiresCiTimeout {
        /// Current status.
        status: TaskStatus,
    },
    /// A GitHub retry was requested for a task that did not fail on GitHub.
    #[error("GitHub retry requires a gh_failed task, task is {status}")]
    RetryGhRequiresGhFailed {
        /// Current status.
        status: TaskStatus,
    },
    /// The task has no recovery menu.
    #[error("task is {status}; nothing to recover")]
    NotRecoverable {
        /// Current status.
        status: TaskStatus,
    },
    /// Step-level approval was requested but no step is waiting.
    #[error("current step is not waiting for a decision")]
    NoPendingStepApproval,
    /// The menu returned a value that is not on offer.
    #[error("unknown menu choice: {0}")]
    UnknownChoice(String),
    /// The user dismissed the menu.
    #[error("menu canceled")]
    MenuCanceled,
    /// The menu could not be shown.
    #[error("selection failed: {0}")]
    Selection(String),
    /// Instructions could not be rendered.
    #[error("failed to render instructions: {0}")]
    Template(String),
    /// Persisting a status or metadata change failed.
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),
    /// Reading an artifact failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// The loop was cancelled between actions.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl From<SelectError> for RecoveryError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::Canceled => Self::MenuCanceled,
            SelectError::Failed(reason) => Self::Selection(reason),
        }
    }
}

impl From<minijinja::Error> for RecoveryError {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}

impl Classify for RecoveryError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::ContinueRequiresCiTimeout { .. }
            | Self::RetryGhRequiresGhFailed { .. }
            | Self::NotRecoverable { .. }
            | Self::NoPendingStepApproval
            | Self::UnknownChoice(_) => ErrorClass::InvalidArgument,
            Self::MenuCanceled => ErrorClass::Cancelled,
            Self::Selection(_) | Self::Template(_) => ErrorClass::Internal,
            Self::Lifecycle(err) => err.class(),
            Self::Store(err) => err.class(),
            Self::Cancelled(err) => err.class(),
        }
    }
}

/// Result of one recovery action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Whether the recovery loop should stop.
    pub done: bool,
    /// Message for the user.
    pub message: String,
    /// Task after the action.
    pub task: Task,
}

/// Resolves tasks left in error states.
pub struct RecoveryService<T, O, C>
where
    T: TaskStore,
    O: UrlOpener,
    C: Clock + Send + Sync,
{
    lifecycle: TaskLifecycleService<T, C>,
    opener: Arc<O>,
    clock: Arc<C>,
}

impl<T, O, C> RecoveryService<T, O, C>
where
    T: TaskStore,
    O: UrlOpener,
    C: Clock + Send + Sync,
{
    /// Creates a recovery service.
    #[must_use]
    pub const fn new(lifecycle: TaskLifecycleService<T, C>, opener: Arc<O>, clock: Arc<C>) -> Self {
        Self {
            lifecycle,
            opener,
            clock,
        }
    }

    /// Executes `action` for `target`.
    ///
    /// Status changes go through the state machine and are persisted before
    /// the outcome is returned; a rejected change persists nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::ContinueRequiresCiTimeout`] or
    /// [`RecoveryError::RetryGhRequiresGhFailed`] when the action does not
    /// apply to the task's status, and lifecycle or store errors when a
    /// change cannot be persisted.
    #[instrument(skip_all, fields(workspace = %target.workspace.name(), action = %action))]
    pub async fn execute(
        &self,
        action: RecoveryAction,
        target: &ScanHit,
        cancel: &CancellationToken,
    ) -> Result<ActionOutcome, RecoveryError> {
        let mut task = target.task.clone();
        let message = match action {
            RecoveryAction::RetryAi => {
                self.lifecycle
                    .transition(cancel, &mut task, TaskStatus::Running, "User requested AI retry")
                    .await?;
                format!(
                    "task {} is running again; the agent will retry the failed step",
                    task.id()
                )
            }
            RecoveryAction::RetryGh => self.retry_gh(&mut task, cancel).await?,
            RecoveryAction::ContinueWaiting => {
                let status = task.status();
                if status != TaskStatus::CiTimeout {
                    return Err(RecoveryError::ContinueRequiresCiTimeout { status });
                }
                self.lifecycle
                    .transition(cancel, &mut task, TaskStatus::Running, "User chose to keep waiting for CI")
                    .await?;
                "waiting for CI again".to_owned()
            }
            RecoveryAction::Abandon => {
                self.lifecycle
                    .transition(cancel, &mut task, TaskStatus::Abandoned, "User abandoned task")
                    .await?;
                format!("task {} abandoned", task.id())
            }
            RecoveryAction::FixManually => instructions::fix_manually(
                &target.workspace,
                &task.id().to_string(),
                task.status().as_str(),
            )?,
            RecoveryAction::ViewErrors => self.view_errors(&task).await?,
            RecoveryAction::ViewLogs => self.view_logs(&task).await,
        };

        self.log_best_effort(&task, &format!("recovery: {action}")).await;
        info!(status = %task.status(), "recovery action finished");
        Ok(ActionOutcome {
            done: action.is_terminal(),
            message,
            task,
        })
    }

    async fn retry_gh(
        &self,
        task: &mut Task,
        cancel: &CancellationToken,
    ) -> Result<String, RecoveryError> {
        let status = task.status();
        if status != TaskStatus::GhFailed {
            return Err(RecoveryError::RetryGhRequiresGhFailed { status });
        }
        let push_conflict = task
            .metadata()
            .push_error_type()
            .is_some_and(|kind| PUSH_CONFLICT_TYPES.contains(&kind.as_str()));
        let reason = if push_conflict {
            "User requested GitHub retry after push conflict"
        } else {
            "User requested GitHub retry"
        };

        let mut working = task.clone();
        working.update_metadata(&*self.clock, |metadata| {
            metadata.remove(metadata_keys::PUSH_ERROR_TYPE);
        });
        self.lifecycle
            .transition(cancel, &mut working, TaskStatus::Running, reason)
            .await?;
        *task = working;

        Ok(if push_conflict {
            "retrying GitHub operations; the branch will be rebased before pushing".to_owned()
        } else {
            "retrying GitHub operations".to_owned()
        })
    }

    async fn view_errors(&self, task: &Task) -> Result<String, RecoveryError> {
        let bytes = match self
            .lifecycle
            .store()
            .get_artifact(task.workspace(), task.id(), VALIDATION_ARTIFACT)
            .await
        {
            Ok(bytes) => bytes,
            Err(err) if err.is_not_found() => return Ok(no_validation_results()),
            Err(err) => return Err(err.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(no_validation_results());
        }

        match serde_json::from_slice::<PipelineResult>(&bytes) {
            Ok(result) => Ok(describe_validation(&result)),
            Err(err) => {
                debug!(error = %err, "validation artifact is not a pipeline result");
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }

    async fn view_logs(&self, task: &Task) -> String {
        let Some(url) = task.metadata().ci_url() else {
            return "no CI URL recorded for this task".to_owned();
        };
        match self.opener.open(&url).await {
            Ok(()) => format!("opened {url}"),
            Err(err) => {
                warn!(error = %err, "failed to open CI URL");
                format!("could not open a browser ({err}); CI logs: {url}")
            }
        }
    }

    /// Asks the user to resolve the step paused on the current step and
    /// persists the choice as `step_approval_choice`.
    ///
    /// The task status is not changed; the returned message tells the user
    /// how to resume.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::NoPendingStepApproval`] when no step is
    /// waiting, [`RecoveryError::MenuCanceled`] when the user backs out and
    /// [`RecoveryError::UnknownChoice`] for a value that was not offered.
    #[instrument(skip_all, fields(workspace = %target.workspace.name()))]
    pub async fn resolve_step_approval(
        &self,
        target: &ScanHit,
        selector: &dyn Selector,
    ) -> Result<ActionOutcome, RecoveryError> {
        let mut task = target.task.clone();
        let pending = pending_step_approval(&task).ok_or(RecoveryError::NoPendingStepApproval)?;
        let step = pending.step_name.clone();
        let options = approval_menu(pending);
        let prompt = format!("Step '{step}' needs a decision");

        let choice = selector.select(&prompt, &options).await?;
        if !options.iter().any(|option| option.value == choice) {
            return Err(RecoveryError::UnknownChoice(choice));
        }

        self.lifecycle
            .update_metadata(&mut task, |metadata| {
                metadata.set_step_approval_choice(choice.clone());
            })
            .await?;
        self.log_best_effort(&task, &format!("recovery: step '{step}' resolved with '{choice}'"))
            .await;
        info!(step = %step, choice = %choice, "step approval recorded");

        let message = instructions::step_approval_resume(&target.workspace, &step, &choice)?;
        Ok(ActionOutcome {
            done: true,
            message,
            task,
        })
    }

    /// Runs the interactive recovery loop for `target`.
    ///
    /// A pending step-level approval takes precedence over the action menu.
    /// View actions hand their outcome to `on_view` and re-prompt; the first
    /// terminal action ends the loop.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::MenuCanceled`] when the user dismisses a
    /// menu, [`RecoveryError::Cancelled`] when `cancel` fires between
    /// actions, and any error from the executed action.
    pub async fn run_loop<F>(
        &self,
        mut target: ScanHit,
        selector: &dyn Selector,
        cancel: &CancellationToken,
        mut on_view: F,
    ) -> Result<ActionOutcome, RecoveryError>
    where
        F: FnMut(&ActionOutcome) + Send,
    {
        if pending_step_approval(&target.task).is_some() {
            return self.resolve_step_approval(&target, selector).await;
        }

        loop {
            if cancel.is_cancelled() {
                return Err(Cancelled.into());
            }
            let status = target.task.status();
            let actions = RecoveryAction::menu_for(status);
            if actions.is_empty() {
                return Err(RecoveryError::NotRecoverable { status });
            }
            let options: Vec<_> = actions.iter().map(|action| action.menu_option()).collect();
            let prompt = format!("Task in {} is {status}. What next?", target.workspace.name());

            let choice = selector.select(&prompt, &options).await?;
            let action = actions
                .iter()
                .copied()
                .find(|action| action.as_str() == choice)
                .ok_or(RecoveryError::UnknownChoice(choice))?;

            let outcome = self.execute(action, &target, cancel).await?;
            if outcome.done {
                return Ok(outcome);
            }
            on_view(&outcome);
            target.task = outcome.task;
        }
    }

    async fn log_best_effort(&self, task: &Task, line: &str) {
        if let Err(err) = self.lifecycle.append_log(task, line).await {
            warn!(error = %err, "failed to append recovery log line");
        }
    }
}

fn no_validation_results() -> String {
    "no validation results recorded for this task".to_owned()
}

fn describe_validation(result: &PipelineResult) -> String {
    let mut lines = vec![result.summary()];
    for step in result.failed_steps() {
        lines.push(format!("--- {} ---", step.name));
        let output = step.output.trim();
        if !output.is_empty() {
            lines.push(output.to_owned());
        }
    }
    lines.join("\n")
}
