//! Store implementations that need no external database.

mod memory;

pub use memory::InMemoryStore;
