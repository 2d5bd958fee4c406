//! In-memory task adapters.

mod task;

pub use task::InMemoryTaskStore;
