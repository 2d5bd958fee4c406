//! Error types for workspace domain validation and parsing.

use super::WorkspaceStatus;
use thiserror::Error;

/// Errors returned while constructing or mutating workspace values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceDomainError {
    /// The workspace name is empty after trimming.
    #[error("workspace name must not be empty")]
    EmptyName,

    /// The workspace name cannot be used as a directory key.
    #[error("invalid workspace name '{0}': names must not contain path separators, whitespace or be '.'/'..'")]
    InvalidName(String),

    /// The workspace name exceeds the length limit.
    #[error("workspace name exceeds 128 character limit: {0}")]
    NameTooLong(String),

    /// The branch name is empty after trimming.
    #[error("workspace branch must not be empty")]
    EmptyBranch,

    /// The requested status change is not allowed.
    #[error("invalid workspace status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: WorkspaceStatus,
        /// Requested status.
        to: WorkspaceStatus,
    },
}

/// Error returned while parsing workspace statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown workspace status: {0}")]
pub struct ParseWorkspaceStatusError(pub String);
