use crate::ports::{BackingStore, StoreError};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// In-memory implementation of BackingStore
#[derive(Debug)]
pub struct InMemoryStore<K, E> {
    entities: BTreeMap<K, Arc<E>>,
}

impl<K: Ord, E> InMemoryStore<K, E> {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
        }
    }

    /// Seed an entity outside of any ledger transaction.
    pub fn insert(&mut self, id: K, entity: E) {
        self.entities.insert(id, Arc::new(entity));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Arc<E>)> {
        self.entities.iter()
    }
}

impl<K: Ord, E> Default for InMemoryStore<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, E> BackingStore<K, E> for InMemoryStore<K, E> {
    fn contains(&self, id: &K) -> bool {
        self.entities.contains_key(id)
    }

    fn get(&self, id: &K) -> Option<Arc<E>> {
        self.entities.get(id).cloned()
    }

    fn put(&mut self, id: K, entity: Arc<E>) -> Result<(), StoreError> {
        self.entities.insert(id, entity);
        Ok(())
    }

    fn remove(&mut self, id: &K) -> Result<(), StoreError> {
        self.entities.remove(id);
        Ok(())
    }

    fn size(&self) -> usize {
        self.entities.len()
    }

    fn id_set(&self) -> BTreeSet<K> {
        self.entities.keys().cloned().collect()
    }
}

/// In-memory store behind a shared lock.
///
/// Clones are handles onto the same map, so a ledger and a commit interceptor
/// (or several concurrent readers) can see one set of entities. Writes to ids
/// registered with `reject_writes_for` fail through every handle, which lets
/// a caller break a multi-ledger commit half-way through.
#[derive(Debug)]
pub struct SharedStore<K, E> {
    inner: Arc<RwLock<InMemoryStore<K, E>>>,
    rejected: Arc<RwLock<BTreeSet<K>>>,
}

impl<K, E> Clone for SharedStore<K, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            rejected: Arc::clone(&self.rejected),
        }
    }
}

impl<K: Ord, E> SharedStore<K, E> {
    pub fn new() -> Self {
        Self::from_store(InMemoryStore::new())
    }

    pub fn from_store(store: InMemoryStore<K, E>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
            rejected: Arc::new(RwLock::new(BTreeSet::new())),
        }
    }

    pub fn insert(&self, id: K, entity: E) {
        self.inner.write().insert(id, entity);
    }

    /// Run `f` with shared read access to the whole map.
    pub fn with_read<R>(&self, f: impl FnOnce(&InMemoryStore<K, E>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Fail every later `put` or `remove` of `id`.
    pub fn reject_writes_for(&self, id: K) {
        self.rejected.write().insert(id);
    }

    pub fn accept_all_writes(&self) {
        self.rejected.write().clear();
    }
}

impl<K: Ord + fmt::Display, E> SharedStore<K, E> {
    fn check_writable(&self, id: &K) -> Result<(), StoreError> {
        if self.rejected.read().contains(id) {
            return Err(StoreError::Rejected {
                id: id.to_string(),
                reason: "writes rejected for this id".to_string(),
            });
        }
        Ok(())
    }
}

impl<K: Ord, E> Default for SharedStore<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + fmt::Display, E> BackingStore<K, E> for SharedStore<K, E> {
    fn contains(&self, id: &K) -> bool {
        self.inner.read().contains(id)
    }

    fn get(&self, id: &K) -> Option<Arc<E>> {
        self.inner.read().get(id)
    }

    fn put(&mut self, id: K, entity: Arc<E>) -> Result<(), StoreError> {
        self.check_writable(&id)?;
        self.inner.write().put(id, entity)
    }

    fn remove(&mut self, id: &K) -> Result<(), StoreError> {
        self.check_writable(id)?;
        self.inner.write().remove(id)
    }

    fn size(&self) -> usize {
        self.inner.read().size()
    }

    fn id_set(&self) -> BTreeSet<K> {
        self.inner.read().id_set()
    }
}
