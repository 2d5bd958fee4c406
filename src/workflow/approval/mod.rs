//! Approve, approve-and-close, and approve-merge-close workflows.

mod runner;
mod service;
mod step;

pub use runner::{ApprovalContext, ApprovalRunner, ApprovalStepError, DEFAULT_REVIEW_BODY};
pub use service::{ApprovalError, ApprovalReport, ApprovalService};
pub use step::{ApprovalPlan, ApprovalStep};
