//! # Transactional Ledger
//!
//! Buffers property changes to the entities of one backing store and makes
//! them visible all at once on `commit`, or never on `rollback`.
//!
//! ## Pending State
//!
//! Every id touched in the open transaction keeps one pending slot, in
//! first-touch order:
//!
//! | Slot | Meaning | Commit effect |
//! |------|---------|---------------|
//! | changes, not created | update of a stored entity | `put(finalized)` |
//! | created | new entity | `put(default + changes)` |
//! | destroyed | removal of a stored entity | `remove(id)` |
//! | created and destroyed | zombie | nothing |
//!
//! A `put` after `destroy` resurrects the slot, zombie or not.

use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, error, warn};

use ledger_telemetry::{
    metric_add, metric_inc, HistogramTimer, LEDGER_COMMITS, LEDGER_COMMIT_DURATION,
    LEDGER_COMMIT_FAILURES, LEDGER_ENTITIES_PERSISTED, LEDGER_ENTITIES_REMOVED, LEDGER_ROLLBACKS,
};
use shared_types::{PropertyValue, ResponseCode};

use crate::domain::change_set::EntityChangeSet;
use crate::domain::change_summary;
use crate::domain::check::{LedgerCheck, PropertyView};
use crate::domain::errors::LedgerError;
use crate::domain::interceptor::{CommitInterceptor, NoopCommitInterceptor};
use crate::domain::property::{full_changes, ChangeMap, Property};
use crate::ports::{BackingStore, StoreError};


#[derive(Debug, Clone)]
struct PendingState<P: Property> {
    changes: ChangeMap<P>,
    /// The id was not in the store when the transaction touched it.
    created: bool,
    destroyed: bool,
}

impl<P: Property> PendingState<P> {
    fn untouched() -> Self {
        Self {
            changes: ChangeMap::new(),
            created: false,
            destroyed: false,
        }
    }

    fn is_zombie(&self) -> bool {
        self.created && self.destroyed
    }
}

enum FlushStep<K, E> {
    Put {
        id: K,
        entity: Arc<E>,
        fresh: bool,
    },
    Remove(K),
}

pub struct TransactionalLedger<K, P: Property, S, I = NoopCommitInterceptor> {
    name: String,
    store: S,
    interceptor: I,
    in_transaction: bool,
    pending: IndexMap<K, PendingState<P>>,
    pending_changes: EntityChangeSet<K, P>,
}

impl<K, P, S> TransactionalLedger<K, P, S, NoopCommitInterceptor>
where
    K: Clone + Eq + Hash + Ord + fmt::Display,
    P: Property,
    S: BackingStore<K, P::Entity>,
{
    pub fn new(name: impl Into<String>, store: S) -> Self {
        Self::with_interceptor(name, store, NoopCommitInterceptor)
    }
}

impl<K, P, S, I> TransactionalLedger<K, P, S, I>
where
    K: Clone + Eq + Hash + Ord + fmt::Display,
    P: Property,
    S: BackingStore<K, P::Entity>,
    I: CommitInterceptor<K, P>,
{
    pub fn with_interceptor(name: impl Into<String>, store: S, interceptor: I) -> Self {
        Self {
            name: name.into(),
            store,
            interceptor,
            in_transaction: false,
            pending: IndexMap::new(),
            pending_changes: EntityChangeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_commit_interceptor(&mut self, interceptor: I) {
        self.interceptor = interceptor;
    }

    pub fn interceptor(&self) -> &I {
        &self.interceptor
    }

    pub fn interceptor_mut(&mut self) -> &mut I {
        &mut self.interceptor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access, bypassing the transaction.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn is_in_transaction(&self) -> bool {
        self.in_transaction
    }

    // =========================================================================
    // TRANSACTION BOUNDARIES
    // =========================================================================

    /// Open a transaction. An already open one is discarded.
    pub fn begin(&mut self) {
        if self.in_transaction {
            warn!(
                ledger = %self.name,
                discarded = self.pending.len(),
                "begin() inside an open transaction, discarding pending changes"
            );
        }
        self.pending.clear();
        self.pending_changes.clear();
        self.interceptor.begin();
        self.in_transaction = true;
        debug!(ledger = %self.name, "transaction opened");
    }

    /// Flush the pending change set to the store in first-touch order.
    ///
    /// If the interceptor refuses the change set, or the store fails part way
    /// through, the transaction stays open and the caller must `rollback()`.
    /// Writes that already reached the store are not undone.
    pub fn commit(&mut self) -> Result<(), LedgerError> {
        self.require_transaction("commit")?;
        let _timer = HistogramTimer::new(&LEDGER_COMMIT_DURATION, &self.name);

        self.pending_changes = self.compute_change_set();
        if let Err(e) = self.interceptor.preview(&self.pending_changes) {
            warn!(ledger = %self.name, error = %e, "commit interceptor refused change set");
            return Err(e);
        }

        let persisted = self.flush().and_then(|()| self.interceptor.post_commit());
        if let Err(source) = persisted {
            metric_inc!(LEDGER_COMMIT_FAILURES, &[self.name.as_str()]);
            error!(
                ledger = %self.name,
                error = %source,
                pending = %self.pending_changes,
                "commit failed mid-way, transaction left open"
            );
            return Err(LedgerError::CommitFailed {
                ledger: self.name.clone(),
                source,
            });
        }

        metric_inc!(LEDGER_COMMITS, &[self.name.as_str()]);
        debug!(
            ledger = %self.name,
            entries = self.pending_changes.size(),
            retained = self.pending_changes.retained_size(),
            "transaction committed"
        );
        self.pending.clear();
        self.pending_changes.clear();
        self.in_transaction = false;
        Ok(())
    }

    /// Discard the pending changes without touching the store.
    pub fn rollback(&mut self) -> Result<(), LedgerError> {
        self.require_transaction("rollback")?;
        let discarded = self.pending.len();
        self.pending.clear();
        self.pending_changes.clear();
        self.in_transaction = false;

        metric_inc!(LEDGER_ROLLBACKS, &[self.name.as_str()]);
        debug!(ledger = %self.name, discarded, "transaction rolled back");
        Ok(())
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Register a new entity with default properties.
    pub fn create(&mut self, id: K) -> Result<(), LedgerError> {
        self.require_transaction("create")?;
        if self.exists(&id) {
            return Err(LedgerError::AlreadyExists {
                ledger: self.name.clone(),
                id: id.to_string(),
            });
        }

        let backed = self.store.contains(&id);
        let state = self.pending.entry(id).or_insert_with(PendingState::untouched);
        state.destroyed = false;
        if backed {
            // Recreating a destroyed stored entity resets every property.
            state.created = false;
            state.changes = full_changes::<P>(&P::Entity::default());
        } else {
            state.created = true;
            state.changes.clear();
        }
        Ok(())
    }

    /// Replace every property of `id` with those of `entity`.
    pub fn put(&mut self, id: K, entity: &P::Entity) -> Result<(), LedgerError> {
        self.require_transaction("put")?;
        let backed = self.store.contains(&id);
        let state = self.pending.entry(id).or_insert_with(PendingState::untouched);
        state.changes = full_changes::<P>(entity);
        state.created = !backed;
        state.destroyed = false;
        Ok(())
    }

    pub fn set(
        &mut self,
        id: &K,
        property: P,
        value: impl Into<PropertyValue>,
    ) -> Result<(), LedgerError> {
        self.require_transaction("set")?;
        let value = value.into();
        if !property.accepts(&value) {
            return Err(LedgerError::ValueTypeMismatch {
                ledger: self.name.clone(),
                property: property.to_string(),
                value: value.kind().to_string(),
            });
        }
        if !self.exists(id) {
            return Err(self.missing(id));
        }

        let state = self
            .pending
            .entry(id.clone())
            .or_insert_with(PendingState::untouched);
        change_summary::update(&mut state.changes, property, value);
        Ok(())
    }

    /// Mark `id` for removal. Destroying a same-transaction creation leaves a
    /// zombie that commits to nothing.
    pub fn destroy(&mut self, id: &K) -> Result<(), LedgerError> {
        self.require_transaction("destroy")?;
        if !self.exists(id) {
            return Err(self.missing(id));
        }

        let state = self
            .pending
            .entry(id.clone())
            .or_insert_with(PendingState::untouched);
        state.destroyed = true;
        state.changes.clear();
        Ok(())
    }

    /// Drop every pending entity that is not in the store.
    pub fn undo_creations(&mut self) -> Result<(), LedgerError> {
        self.require_transaction("undo_creations")?;
        let before = self.pending.len();
        self.pending.retain(|_, state| !state.created);
        debug!(
            ledger = %self.name,
            undone = before - self.pending.len(),
            "pending creations undone"
        );
        Ok(())
    }

    /// Forget pending values of the given properties, keeping all others.
    pub fn undo_changes_of_type(&mut self, properties: &[P]) -> Result<(), LedgerError> {
        self.require_transaction("undo_changes_of_type")?;
        for state in self.pending.values_mut() {
            for property in properties {
                state.changes.remove(property);
            }
        }
        Ok(())
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Pending value, else the default for a pending creation, else the stored value.
    pub fn get(&self, id: &K, property: P) -> Result<PropertyValue, LedgerError> {
        if !self.exists(id) {
            return Err(self.missing(id));
        }
        if let Some(state) = self.pending.get(id) {
            if let Some(value) = state.changes.get(&property) {
                return Ok(value.clone());
            }
            if state.created {
                return Ok(property.get(&P::Entity::default()));
            }
        }
        self.store
            .get(id)
            .map(|entity| property.get(&entity))
            .ok_or_else(|| self.missing(id))
    }

    /// The entity `id` would hold after commit; the stored `Arc` itself when
    /// nothing changed.
    pub fn get_finalized(&self, id: &K) -> Option<Arc<P::Entity>> {
        if !self.exists(id) {
            return None;
        }
        let empty = ChangeMap::new();
        let changes = self.pending.get(id).map_or(&empty, |state| &state.changes);
        Some(change_summary::finalized(id, None, changes, &self.store))
    }

    pub fn exists(&self, id: &K) -> bool {
        match self.pending.get(id) {
            Some(state) if state.destroyed => false,
            Some(state) if state.created => true,
            _ => self.store.contains(id),
        }
    }

    /// True only for a live creation of the open transaction.
    pub fn exists_pending(&self, id: &K) -> bool {
        matches!(self.pending.get(id), Some(state) if state.created && !state.destroyed)
    }

    /// Run `check` over the merged state of `id`.
    ///
    /// Returns the property set's missing-entity code without running the
    /// check when `id` resolves to nothing.
    pub fn validate<C>(&self, id: &K, check: &C) -> ResponseCode
    where
        C: LedgerCheck<P> + ?Sized,
    {
        if !self.exists(id) {
            return P::MISSING_ENTITY;
        }
        let empty = ChangeMap::new();
        let (created, changes) = match self.pending.get(id) {
            Some(state) => (state.created, &state.changes),
            None => (false, &empty),
        };
        let extant = if created { None } else { self.store.get(id) };
        let view = PropertyView::new(extant.as_deref(), changes);
        check.check_using(&view)
    }

    pub fn size(&self) -> usize {
        self.store.size()
    }

    pub fn id_set(&self) -> BTreeSet<K> {
        self.store.id_set()
    }

    /// Human-readable rendering of the pending changes.
    pub fn change_set_so_far(&self) -> String {
        self.compute_change_set().to_string()
    }

    /// The change set a commit issued now would flush.
    pub fn pending_change_set(&self) -> EntityChangeSet<K, P> {
        self.compute_change_set()
    }

    /// Ids with pending work, in first-touch order.
    pub fn touched_ids(&self) -> impl Iterator<Item = &K> {
        self.pending.keys()
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn require_transaction(&self, operation: &'static str) -> Result<(), LedgerError> {
        if self.in_transaction {
            Ok(())
        } else {
            Err(LedgerError::NoActiveTransaction {
                ledger: self.name.clone(),
                operation,
            })
        }
    }

    fn missing(&self, id: &K) -> LedgerError {
        LedgerError::MissingEntity {
            ledger: self.name.clone(),
            id: id.to_string(),
        }
    }

    fn compute_change_set(&self) -> EntityChangeSet<K, P> {
        let mut set = EntityChangeSet::new();
        for (id, state) in &self.pending {
            if state.is_zombie() {
                continue;
            }
            if state.destroyed {
                set.include_removal(id.clone(), self.store.get(id));
            } else if state.created {
                set.include(id.clone(), None, state.changes.clone());
            } else if !state.changes.is_empty() {
                set.include(id.clone(), self.store.get(id), state.changes.clone());
            }
        }
        set
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        let removals_handled = self.interceptor.completes_pending_removals();
        let mut persisted = 0u64;
        let mut removed = 0u64;

        for index in 0..self.pending_changes.size() {
            let step = {
                let entry = self.pending_changes.entry(index);
                match &entry.changes {
                    Some(changes) => FlushStep::Put {
                        id: entry.id.clone(),
                        entity: change_summary::finalized(
                            &entry.id,
                            entry.entity.as_ref(),
                            changes,
                            &self.store,
                        ),
                        fresh: entry.entity.is_none(),
                    },
                    None => FlushStep::Remove(entry.id.clone()),
                }
            };

            match step {
                FlushStep::Put { id, entity, fresh } => {
                    self.store.put(id, Arc::clone(&entity))?;
                    if fresh {
                        self.pending_changes.cache_entity(index, Arc::clone(&entity));
                    }
                    self.interceptor.finish(index, &entity);
                    persisted += 1;
                }
                FlushStep::Remove(id) => {
                    if !removals_handled {
                        self.store.remove(&id)?;
                        removed += 1;
                    }
                }
            }
        }

        metric_add!(LEDGER_ENTITIES_PERSISTED, &[self.name.as_str()], persisted);
        metric_add!(LEDGER_ENTITIES_REMOVED, &[self.name.as_str()], removed);
        Ok(())
    }
}

impl<K, P, S, I> fmt::Debug for TransactionalLedger<K, P, S, I>
where
    K: fmt::Debug,
    P: Property,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionalLedger")
            .field("name", &self.name)
            .field("in_transaction", &self.in_transaction)
            .field("pending", &self.pending.len())
            .finish()
    }
}
