//! Opening URLs in the user's browser.

use crate::process;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Errors returned by [`UrlOpener`] implementations.
#[derive(Debug, Clone, Error)]
pub enum OpenError {
    /// The opener process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Opener program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
    /// The opener exited unsuccessfully.
    #[error("{program} exited unsuccessfully: {stderr}")]
    Failed {
        /// Opener program name.
        program: String,
        /// Trimmed standard error output.
        stderr: String,
    },
}

/// Opens a URL outside the process.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    /// Opens `url`.
    async fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Opener delegating to the platform's URL handler command.
#[derive(Debug, Clone)]
pub struct CommandUrlOpener {
    program: String,
}

impl CommandUrlOpener {
    /// Creates an opener invoking `program <url>`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the opener program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandUrlOpener {
    fn default() -> Self {
        let program = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        Self::new(program)
    }
}

#[async_trait]
impl UrlOpener for CommandUrlOpener {
    #[instrument(skip(self), fields(program = %self.program))]
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        let output = process::run(&self.program, &[url], None)
            .await
            .map_err(|err| OpenError::Spawn {
                program: self.program.clone(),
                source: Arc::new(err),
            })?;
        if output.success {
            return Ok(());
        }
        Err(OpenError::Failed {
            program: self.program.clone(),
            stderr: output.stderr,
        })
    }
}
