//! Code-hosting operations on pull requests.
//!
//! - Port contracts in [`ports`]
//! - The `gh` CLI adapter in [`adapters`]

pub mod adapters;
pub mod ports;

pub use adapters::GhCli;
pub use ports::{
    HostingClient, HostingError, HostingResult, MergeMethod, MergeOptions, PullRequestTarget,
};
