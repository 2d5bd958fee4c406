//! Step definitions for approval scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
