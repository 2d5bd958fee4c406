//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;

pub use repository::{
    TaskStore, TaskStoreError, TaskStoreResult, split_artifact_name, versioned_artifact_name,
};
