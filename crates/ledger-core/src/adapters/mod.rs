//! Backing store adapters.

pub mod memory_store;
pub mod recording_store;

pub use memory_store::{InMemoryStore, SharedStore};
pub use recording_store::{RecordingStore, StoreOp};
