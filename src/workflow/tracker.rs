//! Ordered step execution with per-step notifications.

use super::reporter::StepReporter;
use crate::config::OutputMode;
use crate::error::{Cancelled, Classify, ErrorClass};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A named unit of a workflow.
pub trait WorkflowStep {
    /// Human-readable step name.
    fn name(&self) -> &str;
}

/// Executes steps of one kind against a shared context.
#[async_trait]
pub trait StepRunner: Send + Sync {
    /// Step kind understood by this runner.
    type Step: WorkflowStep + Send + Sync;
    /// State shared by all steps of one workflow run.
    type Context: Send;
    /// Step failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes `step`, returning an optional message for the user.
    async fn run(
        &self,
        step: &Self::Step,
        ctx: &mut Self::Context,
    ) -> Result<Option<String>, Self::Error>;
}

/// Record of a completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Step name.
    pub step: String,
    /// Message returned by the step.
    pub message: Option<String>,
}

/// Errors returned by [`StepTracker::execute_steps`].
#[derive(Debug, Error)]
pub enum ExecuteError<E>
where
    E: std::error::Error + 'static,
{
    /// The token fired at a step boundary.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    /// A step failed; later steps were not run.
    #[error("step '{step}' failed: {source}")]
    Step {
        /// Name of the failed step.
        step: String,
        /// The step's own error.
        #[source]
        source: E,
    },
}

impl<E> Classify for ExecuteError<E>
where
    E: std::error::Error + Classify + 'static,
{
    fn class(&self) -> ErrorClass {
        match self {
            Self::Cancelled(_) => ErrorClass::Cancelled,
            Self::Step { source, .. } => source.class(),
        }
    }
}

/// Holds an ordered step list and a cursor.
///
/// Execution is not transactional: steps that finished before a failure keep
/// their effects.
pub struct StepTracker<S>
where
    S: WorkflowStep,
{
    steps: Vec<S>,
    cursor: usize,
    reporter: Arc<dyn StepReporter>,
    output: OutputMode,
}

impl<S> StepTracker<S>
where
    S: WorkflowStep + Send + Sync,
{
    /// Creates a tracker positioned before the first step.
    #[must_use]
    pub const fn new(steps: Vec<S>, reporter: Arc<dyn StepReporter>, output: OutputMode) -> Self {
        Self {
            steps,
            cursor: 0,
            reporter,
            output,
        }
    }

    /// Returns the steps.
    #[must_use]
    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    /// Returns the index of the next step to run.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Runs the remaining steps in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::Cancelled`] when `cancel` fires before a step
    /// starts and [`ExecuteError::Step`] with the failing step's error.
    pub async fn execute_steps<R>(
        &mut self,
        runner: &R,
        ctx: &mut R::Context,
        cancel: &CancellationToken,
    ) -> Result<Vec<StepOutcome>, ExecuteError<R::Error>>
    where
        R: StepRunner<Step = S>,
    {
        let total = self.steps.len();
        let mut outcomes = Vec::with_capacity(total.saturating_sub(self.cursor));
        while let Some(step) = self.steps.get(self.cursor) {
            if cancel.is_cancelled() {
                return Err(Cancelled.into());
            }
            let position = self.cursor.saturating_add(1);
            if !self.output.is_json() {
                self.reporter.step_started(position, total, step.name());
            }
            debug!(step = step.name(), position, total, "running step");

            match runner.run(step, ctx).await {
                Ok(message) => {
                    self.reporter
                        .step_completed(position, total, step.name(), message.as_deref());
                    outcomes.push(StepOutcome {
                        step: step.name().to_owned(),
                        message,
                    });
                    self.cursor = position;
                }
                Err(source) => {
                    self.reporter
                        .step_failed(position, total, step.name(), &source);
                    return Err(ExecuteError::Step {
                        step: step.name().to_owned(),
                        source,
                    });
                }
            }
        }
        Ok(outcomes)
    }
}
