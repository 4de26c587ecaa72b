//! Post store implementations.

mod memory;
pub mod seed;

pub use memory::InMemoryPostStore;
