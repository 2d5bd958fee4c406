//! Error types for task domain validation and parsing.

use super::TaskStatus;
use thiserror::Error;

/// Errors returned while constructing or mutating tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not a valid UUID.
    #[error("invalid task identifier: {0}")]
    InvalidTaskId(String),

    /// A task plan must contain at least one step.
    #[error("task plan must contain at least one step")]
    EmptyPlan,

    /// A step name is empty after trimming.
    #[error("step name must not be empty")]
    EmptyStepName,

    /// A step index does not address a step of the plan.
    #[error("step index {index} is out of range for a plan of {len} steps")]
    StepIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of steps in the plan.
        len: usize,
    },

    /// The lifecycle state machine rejected the status change.
    #[error("invalid task state transition: {from} -> {to}")]
    InvalidStateTransition {
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
