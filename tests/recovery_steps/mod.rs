//! Step definitions for recovery scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
