//! Adapter implementations for the backlog store.

mod file;
mod memory;

pub use file::FileBacklogStore;
pub use memory::InMemoryBacklogStore;
