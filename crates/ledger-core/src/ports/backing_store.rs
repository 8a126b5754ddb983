//! # Backing Store Port
//!
//! The authoritative key-value store a ledger overlays. Entities are handed
//! out as `Arc`s: a reader may hold one across calls, but it must never be
//! mutated in place. Writers always replace the whole value.

use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store rejected write of {id}: {reason}")]
    Rejected { id: String, reason: String },
}

/// Durable store for one entity kind.
pub trait BackingStore<K, E> {
    fn contains(&self, id: &K) -> bool;

    /// Shared handle to the stored entity.
    fn get(&self, id: &K) -> Option<Arc<E>>;

    fn put(&mut self, id: K, entity: Arc<E>) -> Result<(), StoreError>;

    fn remove(&mut self, id: &K) -> Result<(), StoreError>;

    fn size(&self) -> usize;

    fn id_set(&self) -> BTreeSet<K>;
}
