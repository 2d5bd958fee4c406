//! Validation pipeline contract and the service recording its verdict.
//!
//! The pipeline's own command execution is external; this module consumes it
//! through [`ports::ValidationRunner`].

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{PipelineResult, VALIDATION_ARTIFACT, ValidationStepResult};
pub use ports::{ProgressCallback, ValidationProgress, ValidationRunner, ValidationRunnerError};
pub use service::{ValidationError, ValidationOutcome, ValidationService};
