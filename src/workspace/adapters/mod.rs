//! Adapter implementations for workspace ports.

pub mod file;
pub mod memory;

mod git;

pub use git::GitWorktrees;
