//! Task aggregate root and related lifecycle types.

use super::{StepResult, TaskDomainError, TaskId, TaskMetadata, TaskStatus, TaskStep};
use crate::workspace::domain::WorkspaceName;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Audit record of one status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    /// Status before the change.
    pub from: TaskStatus,
    /// Status after the change.
    pub to: TaskStatus,
    /// Why the change happened.
    pub reason: String,
    /// When the change happened.
    pub at: DateTime<Utc>,
}

/// Parameter object for starting a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Owning workspace.
    pub workspace: WorkspaceName,
    /// Template the plan was generated from.
    pub template_id: String,
    /// What the task should achieve.
    pub description: String,
    /// Ordered step plan.
    pub steps: Vec<TaskStep>,
    /// Initial metadata.
    pub metadata: TaskMetadata,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    workspace: WorkspaceName,
    template_id: String,
    description: String,
    status: TaskStatus,
    current_step: usize,
    steps: Vec<TaskStep>,
    #[serde(default)]
    step_results: Vec<StepResult>,
    #[serde(default)]
    metadata: TaskMetadata,
    #[serde(default)]
    transitions: Vec<StatusTransition>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a running task at the first step of its plan.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyPlan`] when no steps are given.
    pub fn new(request: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        if request.steps.is_empty() {
            return Err(TaskDomainError::EmptyPlan);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            workspace: request.workspace,
            template_id: request.template_id,
            description: request.description,
            status: TaskStatus::Running,
            current_step: 0,
            steps: request.steps,
            step_results: Vec::new(),
            metadata: request.metadata,
            transitions: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning workspace name.
    #[must_use]
    pub const fn workspace(&self) -> &WorkspaceName {
        &self.workspace
    }

    /// Returns the template identifier.
    #[must_use]
    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the index of the current step.
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current_step
    }

    /// Returns the step plan.
    #[must_use]
    pub fn steps(&self) -> &[TaskStep] {
        &self.steps
    }

    /// Returns the step result history.
    #[must_use]
    pub fn step_results(&self) -> &[StepResult] {
        &self.step_results
    }

    /// Returns the metadata map.
    #[must_use]
    pub const fn metadata(&self) -> &TaskMetadata {
        &self.metadata
    }

    /// Returns the status change history.
    #[must_use]
    pub fn transitions(&self) -> &[StatusTransition] {
        &self.transitions
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the authoritative result for the current step.
    ///
    /// The history may hold several results for one step, so this is the
    /// last entry whose `step_index` equals the current step.
    #[must_use]
    pub fn current_step_result(&self) -> Option<&StepResult> {
        self.step_results
            .iter()
            .rev()
            .find(|result| result.step_index == self.current_step)
    }

    /// Changes the lifecycle status and records the reason.
    ///
    /// The task is left untouched when the transition is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the current
    /// status cannot reach `target`.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        reason: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStateTransition {
                from: self.status,
                to: target,
            });
        }

        let at = clock.utc();
        self.transitions.push(StatusTransition {
            from: self.status,
            to: target,
            reason: reason.into(),
            at,
        });
        self.status = target;
        self.updated_at = at;
        Ok(())
    }

    /// Appends a result to the step history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StepIndexOutOfRange`] when the result does
    /// not address a step of the plan.
    pub fn record_step_result(
        &mut self,
        result: StepResult,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_step_index(result.step_index)?;
        self.step_results.push(result);
        self.touch(clock);
        Ok(())
    }

    /// Moves the cursor to `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StepIndexOutOfRange`] when `index` does not
    /// address a step of the plan.
    pub fn set_current_step(&mut self, index: usize, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_step_index(index)?;
        self.current_step = index;
        self.touch(clock);
        Ok(())
    }

    /// Applies `update` to the metadata and stamps the update time.
    pub fn update_metadata(&mut self, clock: &impl Clock, update: impl FnOnce(&mut TaskMetadata)) {
        update(&mut self.metadata);
        self.touch(clock);
    }

    fn ensure_step_index(&self, index: usize) -> Result<(), TaskDomainError> {
        if index >= self.steps.len() {
            return Err(TaskDomainError::StepIndexOutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
