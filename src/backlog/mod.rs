//! Backlog discoveries linked from tasks.
//!
//! A task started from a discovery carries its identifier in metadata.
//! Approving the task completes the discovery on a best-effort basis.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{FileBacklogStore, InMemoryBacklogStore};
pub use domain::{BacklogDomainError, Discovery, DiscoveryId, DiscoveryStatus};
pub use ports::{BacklogResult, BacklogStore, BacklogStoreError};
