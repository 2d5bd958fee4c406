//! Port for the external validation pipeline.

use super::domain::PipelineResult;
use crate::error::{Classify, ErrorClass};
use async_trait::async_trait;
use camino::Utf8Path;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Progress notification emitted while the pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationProgress {
    /// A step started.
    Started {
        /// Step name.
        step: String,
    },
    /// A step finished.
    Finished {
        /// Step name.
        step: String,
        /// Whether it succeeded.
        success: bool,
    },
}

/// Callback receiving [`ValidationProgress`] notifications.
pub type ProgressCallback = Arc<dyn Fn(&ValidationProgress) + Send + Sync>;

/// Errors returned by validation runners.
#[derive(Debug, Clone, Error)]
pub enum ValidationRunnerError {
    /// The run was cancelled.
    #[error("validation cancelled")]
    Cancelled,
    /// The pipeline could not be executed at all.
    #[error("validation pipeline failed to run: {0}")]
    Execution(String),
}

impl Classify for ValidationRunnerError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Cancelled => ErrorClass::Cancelled,
            Self::Execution(_) => ErrorClass::External,
        }
    }
}

/// Runs lint/test/build style checks in a directory.
///
/// A failing check is reported through [`PipelineResult::success`]; errors are
/// reserved for runs that could not complete.
#[async_trait]
pub trait ValidationRunner: Send + Sync {
    /// Installs a progress callback used by subsequent runs.
    fn set_progress_callback(&self, callback: ProgressCallback);

    /// Runs the pipeline inside `dir`.
    async fn run(
        &self,
        cancel: &CancellationToken,
        dir: &Utf8Path,
    ) -> Result<PipelineResult, ValidationRunnerError>;
}
