//! Workspace management.
//!
//! A workspace is an isolated git worktree plus its persisted record. Closing
//! a workspace is best-effort: worktree and branch cleanup failures are
//! reported as warnings and never block the status change.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
