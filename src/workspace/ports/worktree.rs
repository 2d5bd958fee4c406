//! Port for git worktree and branch management.

use async_trait::async_trait;
use camino::Utf8Path;
use std::sync::Arc;
use thiserror::Error;

/// Result type for worktree operations.
pub type WorktreeResult<T> = Result<T, WorktreeError>;

/// Git worktree contract used when creating and closing workspaces.
#[async_trait]
pub trait WorktreeOps: Send + Sync {
    /// Creates a worktree at `path` on a new branch.
    async fn add_worktree(&self, path: &Utf8Path, branch: &str) -> WorktreeResult<()>;

    /// Removes the worktree at `path`.
    async fn remove_worktree(&self, path: &Utf8Path, force: bool) -> WorktreeResult<()>;

    /// Deletes a local branch.
    async fn delete_branch(&self, branch: &str) -> WorktreeResult<()>;
}

/// Errors returned by worktree adapters.
#[derive(Debug, Clone, Error)]
pub enum WorktreeError {
    /// The git command exited unsuccessfully.
    #[error("{command} failed: {stderr}")]
    Command {
        /// Rendered command line.
        command: String,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The git process could not be spawned.
    #[error("failed to run git: {0}")]
    Spawn(Arc<std::io::Error>),
}

impl WorktreeError {
    /// Wraps a process spawn failure.
    #[must_use]
    pub fn spawn(err: std::io::Error) -> Self {
        Self::Spawn(Arc::new(err))
    }
}
