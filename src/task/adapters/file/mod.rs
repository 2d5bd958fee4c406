//! File-backed task adapters.

mod task;

pub use task::FileTaskStore;
