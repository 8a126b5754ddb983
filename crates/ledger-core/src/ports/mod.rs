//! Ports consumed by the ledger.

pub mod backing_store;

pub use backing_store::{BackingStore, StoreError};
