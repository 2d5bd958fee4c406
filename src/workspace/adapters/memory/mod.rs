//! In-memory workspace adapters.

mod workspace;

pub use workspace::InMemoryWorkspaceStore;
