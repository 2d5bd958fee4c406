//! Port contracts for workspace management.

pub mod repository;
pub mod worktree;

pub use repository::{WorkspaceStore, WorkspaceStoreError, WorkspaceStoreResult};
pub use worktree::{WorktreeError, WorktreeOps, WorktreeResult};
