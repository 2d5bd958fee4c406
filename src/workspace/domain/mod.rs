//! Domain model for workspaces.
//!
//! A workspace pairs an isolated git worktree with the persisted metadata that
//! describes one unit of AI-assisted work.

mod error;
mod name;
mod workspace;

pub use error::{ParseWorkspaceStatusError, WorkspaceDomainError};
pub use name::WorkspaceName;
pub use workspace::{NewWorkspace, Workspace, WorkspaceStatus};

/// Workspace metadata key naming the hosted repository (`owner/repo`).
pub const REPOSITORY_METADATA_KEY: &str = "repository";
