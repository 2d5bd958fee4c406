//! Step-tracked workflow engine.
//!
//! A workflow is an ordered list of steps run against one shared context. The
//! first failing step aborts the rest; completed steps are not rolled back.

pub mod approval;
mod reporter;
mod tracker;

pub use reporter::{NullReporter, StepReporter, WriterReporter};
pub use tracker::{ExecuteError, StepOutcome, StepRunner, StepTracker, WorkflowStep};
