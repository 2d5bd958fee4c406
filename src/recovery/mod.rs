//! Recovery of tasks left in error states.
//!
//! A task whose current step paused with approval options is resolved
//! through step-level approval, which records the user's choice without
//! changing the status. Any other error-state task is offered a menu of
//! [`RecoveryAction`]s. View actions return to the menu; every other action
//! ends the loop.

mod action;
mod instructions;
mod service;
mod step_approval;

pub use action::{ParseRecoveryActionError, RecoveryAction};
pub use service::{ActionOutcome, RecoveryError, RecoveryService};
pub use step_approval::{find_current_step_result, pending_step_approval};

#[cfg(test)]
mod tests;
