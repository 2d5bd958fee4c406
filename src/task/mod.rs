//! Task lifecycle management.
//!
//! A task is the stateful unit of work executed inside a workspace. It follows
//! a fixed step plan, keeps an append-only history of step results, and moves
//! through the lifecycle table enforced by [`domain::TaskStatus`]. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
