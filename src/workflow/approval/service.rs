//! Approval entry point combining target validation and step execution.

use super::runner::{ApprovalContext, ApprovalStepError};
use super::step::{ApprovalPlan, ApprovalStep};
use crate::config::OutputMode;
use crate::error::{Classify, ErrorClass};
use crate::scan::ScanHit;
use crate::task::domain::{Task, TaskStatus};
use crate::workflow::reporter::StepReporter;
use crate::workflow::tracker::{ExecuteError, StepOutcome, StepRunner, StepTracker};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Errors returned by [`ApprovalService::approve`].
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// The task is not waiting for approval.
    #[error("task is {status}, not awaiting_approval")]
    NotAwaitingApproval {
        /// Current status.
        status: TaskStatus,
    },
    /// A step failed or the run was cancelled.
    #[error(transparent)]
    Execute(#[from] ExecuteError<ApprovalStepError>),
}

impl Classify for ApprovalError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::NotAwaitingApproval { .. } => ErrorClass::InvalidTransition,
            Self::Execute(err) => err.class(),
        }
    }
}

/// Result of a successful approval run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalReport {
    /// Task after all steps ran.
    pub task: Task,
    /// Per-step outcomes in execution order.
    pub messages: Vec<StepOutcome>,
}

/// Runs approval plans.
pub struct ApprovalService<R>
where
    R: StepRunner<Step = ApprovalStep, Context = ApprovalContext, Error = ApprovalStepError>,
{
    runner: R,
    reporter: Arc<dyn StepReporter>,
    output: OutputMode,
}

impl<R> ApprovalService<R>
where
    R: StepRunner<Step = ApprovalStep, Context = ApprovalContext, Error = ApprovalStepError>,
{
    /// Creates an approval service.
    #[must_use]
    pub const fn new(runner: R, reporter: Arc<dyn StepReporter>, output: OutputMode) -> Self {
        Self {
            runner,
            reporter,
            output,
        }
    }

    /// Runs `plan` for the selected target.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotAwaitingApproval`] before any step runs
    /// when the task is in another status, and [`ApprovalError::Execute`]
    /// when a step fails or the run is cancelled.
    #[instrument(skip_all, fields(workspace = %target.workspace.name(), plan = ?plan))]
    pub async fn approve(
        &self,
        plan: ApprovalPlan,
        target: ScanHit,
        cancel: &CancellationToken,
    ) -> Result<ApprovalReport, ApprovalError> {
        let status = target.task.status();
        if status != TaskStatus::AwaitingApproval {
            return Err(ApprovalError::NotAwaitingApproval { status });
        }

        let mut ctx = ApprovalContext {
            workspace: target.workspace,
            task: target.task,
            cancel: cancel.clone(),
        };
        let mut tracker = StepTracker::new(plan.steps(), Arc::clone(&self.reporter), self.output);
        let messages = tracker
            .execute_steps(&self.runner, &mut ctx, cancel)
            .await?;
        info!(steps = messages.len(), "approval finished");

        Ok(ApprovalReport {
            task: ctx.task,
            messages,
        })
    }
}
