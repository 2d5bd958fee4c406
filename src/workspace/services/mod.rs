//! Application services for workspace management.

mod manager;

pub use manager::{
    CloseOutcome, CreateWorkspaceRequest, WorkspaceManager, WorkspaceServiceError,
    WorkspaceServiceResult,
};
