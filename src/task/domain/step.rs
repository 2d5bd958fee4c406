//! Task plan steps and the step result history.

use super::TaskDomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One named unit of a task plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStep {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl TaskStep {
    /// Creates a validated step.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyStepName`] when the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyStepName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            description: None,
        })
    }

    /// Sets the step description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the step description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// How a single step execution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepResultStatus {
    /// The step finished successfully.
    Success,
    /// The step failed.
    Failed,
    /// The step paused to ask the user a question.
    AwaitingApproval,
}

/// A choice offered by a step that paused for user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalOption {
    /// Stable key persisted as the user's choice.
    pub key: String,
    /// Short label shown in menus.
    pub label: String,
    /// Longer explanation of the consequence.
    #[serde(default)]
    pub description: String,
    /// Whether this is the suggested choice.
    #[serde(default)]
    pub recommended: bool,
}

impl ApprovalOption {
    /// Creates an option with a key and label.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: String::new(),
            recommended: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the option as recommended.
    #[must_use]
    pub const fn recommended(mut self) -> Self {
        self.recommended = true;
        self
    }
}

/// Record of one execution of a plan step.
///
/// Results form an append-only history; retries and resumes produce several
/// entries for the same `step_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Index of the executed step in the plan.
    pub step_index: usize,
    /// Name of the executed step.
    pub step_name: String,
    /// Outcome of the execution.
    pub status: StepResultStatus,
    /// Free-form output.
    #[serde(default)]
    pub output: String,
    /// Choices offered when the step paused for user input.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub approval_options: Vec<ApprovalOption>,
    /// When the result was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl StepResult {
    /// Returns whether the step paused with choices for the user.
    #[must_use]
    pub fn needs_step_approval(&self) -> bool {
        !self.approval_options.is_empty()
    }
}
