//! Domain model for task lifecycle management.
//!
//! A task is the stateful unit of work executed inside a workspace. Its
//! status follows the transition table in [`TaskStatus::can_transition_to`];
//! the domain only mutates in-memory values and never performs I/O.

mod error;
mod ids;
mod metadata;
mod status;
mod step;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use metadata::{TaskMetadata, keys as metadata_keys};
pub use status::TaskStatus;
pub use step::{ApprovalOption, StepResult, StepResultStatus, TaskStep};
pub use task::{NewTask, StatusTransition, Task};
