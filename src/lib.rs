//! Atelier: orchestration core for AI-assisted development tasks.
//!
//! Each task runs inside an isolated git worktree (a workspace) and moves
//! through a lifecycle of running, validating, awaiting approval, or waiting
//! in one of several failure states. This crate provides the lifecycle state
//! machine, the persistence contracts behind it, the step-tracked approval
//! workflows, and the recovery engine for tasks left in error states. Flag
//! parsing and output rendering stay with the embedding CLI.
//!
//! # Architecture
//!
//! Atelier follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for stores, git, GitHub and menus
//! - **Adapters**: File-backed and in-memory stores, `git` and `gh` processes
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, state machine and task store
//! - [`workspace`]: Workspaces, worktrees and the workspace store
//! - [`scan`]: Discovery scans and target selection
//! - [`workflow`]: Step-tracked workflows and the approval plans
//! - [`recovery`]: Recovery actions and step-level approval
//! - [`validation`]: Validation pipeline contract
//! - [`backlog`]: Backlog discoveries linked from tasks
//! - [`hosting`]: Pull request operations through `gh`
//! - [`interaction`]: Menu and URL opener contracts

pub mod backlog;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod hosting;
pub mod interaction;
pub mod process;
pub mod recovery;
pub mod scan;
pub mod storage;
pub mod task;
pub mod telemetry;
pub mod validation;
pub mod workflow;
pub mod workspace;

#[cfg(test)]
mod test_support;
