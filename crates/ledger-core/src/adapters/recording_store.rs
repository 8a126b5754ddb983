//! Store that logs every write, for asserting what a commit did.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::adapters::InMemoryStore;
use crate::ports::{BackingStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp<K> {
    Put(K),
    Remove(K),
}

/// In-memory store that records puts and removes in call order.
///
/// Puts for ids registered with `fail_puts_for` are rejected, which lets a
/// test break a commit half-way through.
#[derive(Debug)]
pub struct RecordingStore<K, E> {
    inner: InMemoryStore<K, E>,
    ops: Vec<StoreOp<K>>,
    failing_puts: BTreeSet<K>,
}

impl<K: Ord + Clone, E> RecordingStore<K, E> {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            ops: Vec::new(),
            failing_puts: BTreeSet::new(),
        }
    }

    /// Insert without recording an op.
    pub fn seed(&mut self, id: K, entity: E) {
        self.inner.insert(id, entity);
    }

    pub fn ops(&self) -> &[StoreOp<K>] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn put_ids(&self) -> Vec<K> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                StoreOp::Put(id) => Some(id.clone()),
                StoreOp::Remove(_) => None,
            })
            .collect()
    }

    pub fn removed_ids(&self) -> Vec<K> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                StoreOp::Remove(id) => Some(id.clone()),
                StoreOp::Put(_) => None,
            })
            .collect()
    }

    pub fn fail_puts_for(&mut self, id: K) {
        self.failing_puts.insert(id);
    }
}

impl<K: Ord + Clone, E> Default for RecordingStore<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + std::fmt::Display, E> BackingStore<K, E> for RecordingStore<K, E> {
    fn contains(&self, id: &K) -> bool {
        self.inner.contains(id)
    }

    fn get(&self, id: &K) -> Option<Arc<E>> {
        self.inner.get(id)
    }

    fn put(&mut self, id: K, entity: Arc<E>) -> Result<(), StoreError> {
        if self.failing_puts.contains(&id) {
            return Err(StoreError::Rejected {
                id: id.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.ops.push(StoreOp::Put(id.clone()));
        self.inner.put(id, entity)
    }

    fn remove(&mut self, id: &K) -> Result<(), StoreError> {
        self.ops.push(StoreOp::Remove(id.clone()));
        self.inner.remove(id)
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn id_set(&self) -> BTreeSet<K> {
        self.inner.id_set()
    }
}
