//! File-backed workspace adapters.

mod workspace;

pub(crate) use workspace::WORKSPACES_DIR;
pub use workspace::FileWorkspaceStore;
