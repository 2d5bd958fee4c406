//! Application services for task lifecycle orchestration.

mod lifecycle;
mod state_machine;

pub use lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
pub use state_machine::{LifecycleStateMachine, TransitionError};
