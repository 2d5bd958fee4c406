//! Port for pull request review, comment and merge operations.

use crate::error::{Classify, ErrorClass};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for hosting operations.
pub type HostingResult<T> = Result<T, HostingError>;

/// Identifies the pull request an operation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestTarget {
    /// Pull request number.
    pub number: u64,
    /// Checkout to run commands from, when one still exists.
    pub worktree: Option<Utf8PathBuf>,
    /// `owner/repo` slug, when known.
    pub repository: Option<String>,
}

impl PullRequestTarget {
    /// Creates a target for pull request `number`.
    #[must_use]
    pub const fn new(number: u64) -> Self {
        Self {
            number,
            worktree: None,
            repository: None,
        }
    }

    /// Sets the checkout directory.
    #[must_use]
    pub fn in_worktree(mut self, worktree: impl Into<Utf8PathBuf>) -> Self {
        self.worktree = Some(worktree.into());
        self
    }

    /// Sets the repository slug.
    #[must_use]
    pub fn in_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }
}

/// Merge strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeMethod {
    /// Squash all commits into one.
    #[default]
    Squash,
    /// Create a merge commit.
    Merge,
    /// Rebase onto the base branch.
    Rebase,
}

impl MergeMethod {
    /// Returns the `gh pr merge` flag for this method.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Squash => "--squash",
            Self::Merge => "--merge",
            Self::Rebase => "--rebase",
        }
    }
}

/// Options for merging a pull request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Merge strategy.
    pub method: MergeMethod,
    /// Delete the head branch after merging.
    pub delete_branch: bool,
    /// Bypass branch protection.
    pub admin: bool,
}

impl MergeOptions {
    /// Squash merge keeping the head branch.
    #[must_use]
    pub const fn squash() -> Self {
        Self {
            method: MergeMethod::Squash,
            delete_branch: false,
            admin: false,
        }
    }

    /// Returns a copy with the administrative bypass enabled.
    #[must_use]
    pub const fn with_admin(mut self) -> Self {
        self.admin = true;
        self
    }
}

/// Pull request operations on the code host.
#[async_trait]
pub trait HostingClient: Send + Sync {
    /// Submits an approving review.
    ///
    /// # Errors
    ///
    /// Returns [`HostingError::SelfApproval`] when the caller authored the
    /// pull request.
    async fn approve_pull_request(&self, target: &PullRequestTarget, body: &str)
    -> HostingResult<()>;

    /// Posts a plain comment.
    async fn comment_pull_request(&self, target: &PullRequestTarget, body: &str)
    -> HostingResult<()>;

    /// Merges the pull request.
    async fn merge_pull_request(
        &self,
        target: &PullRequestTarget,
        options: MergeOptions,
    ) -> HostingResult<()>;
}

/// Errors returned by hosting adapters.
#[derive(Debug, Clone, Error)]
pub enum HostingError {
    /// The host refused because the caller owns the pull request.
    #[error("cannot approve your own pull request")]
    SelfApproval,
    /// The command exited unsuccessfully.
    #[error("{command} failed: {stderr}")]
    Command {
        /// Rendered command line.
        command: String,
        /// Trimmed standard error output.
        stderr: String,
    },
    /// The command could not be started.
    #[error("failed to run gh: {0}")]
    Spawn(Arc<std::io::Error>),
}

impl Classify for HostingError {
    fn class(&self) -> ErrorClass {
        ErrorClass::External
    }
}
