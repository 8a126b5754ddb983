//! # Unique Tokens Interceptor
//!
//! Keeps the owner index in step with the nfts ledger and removes burned or
//! wiped serials itself, unlinking each one only once the store has let it go.
//!
//! ```text
//! preview:      plan  [link | relink | remove+unlink]  from the change set
//! post_commit:  apply the plan in order, stopping at the first failed remove
//! ```
//!
//! A failed remove fails the commit. The index then still matches the store:
//! moves already applied were persisted by the ledger's flush, and the
//! unapplied rest of the plan is dropped with the rolled back transaction.

use std::collections::{BTreeMap, BTreeSet};

use ledger_core::{
    BackingStore, CommitInterceptor, EntityChangeSet, LedgerError, SharedStore, StoreError,
};
use shared_types::{AccountId, NftId, PropertyValue, UniqueToken};
use tracing::debug;

use crate::domain::NftProperty;

/// Serials held by each non-treasury owner.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NftOwnershipIndex {
    by_owner: BTreeMap<AccountId, BTreeSet<NftId>>,
}

impl NftOwnershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every serial currently in `store`.
    pub fn scan(store: &SharedStore<NftId, UniqueToken>) -> Self {
        store.with_read(|nfts| {
            let mut index = Self::new();
            for (id, nft) in nfts.iter() {
                index.link(nft.owner, *id);
            }
            index
        })
    }

    /// Treasury-held serials (`MISSING` owner) are not indexed.
    pub fn link(&mut self, owner: AccountId, nft: NftId) {
        if !owner.is_missing() {
            self.by_owner.entry(owner).or_default().insert(nft);
        }
    }

    pub fn unlink(&mut self, owner: AccountId, nft: NftId) {
        if let Some(serials) = self.by_owner.get_mut(&owner) {
            serials.remove(&nft);
            if serials.is_empty() {
                self.by_owner.remove(&owner);
            }
        }
    }

    pub fn serials_of(&self, owner: AccountId) -> impl Iterator<Item = &NftId> {
        self.by_owner.get(&owner).into_iter().flatten()
    }

    pub fn count(&self, owner: AccountId) -> usize {
        self.by_owner.get(&owner).map_or(0, BTreeSet::len)
    }

    pub fn owns(&self, owner: AccountId, nft: &NftId) -> bool {
        self.by_owner
            .get(&owner)
            .is_some_and(|serials| serials.contains(nft))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexOp {
    Move {
        nft: NftId,
        from: AccountId,
        to: AccountId,
    },
    Remove {
        nft: NftId,
        owner: AccountId,
    },
}

#[derive(Debug)]
pub struct UniqueTokensCommitInterceptor {
    store: SharedStore<NftId, UniqueToken>,
    index: NftOwnershipIndex,
    planned: Vec<IndexOp>,
}

impl UniqueTokensCommitInterceptor {
    /// `store` must be a handle onto the nfts ledger's own store.
    pub fn new(store: SharedStore<NftId, UniqueToken>) -> Self {
        let index = NftOwnershipIndex::scan(&store);
        Self {
            store,
            index,
            planned: Vec::new(),
        }
    }

    pub fn index(&self) -> &NftOwnershipIndex {
        &self.index
    }
}

impl CommitInterceptor<NftId, NftProperty> for UniqueTokensCommitInterceptor {
    fn begin(&mut self) {
        self.planned.clear();
    }

    fn preview(&mut self, pending: &EntityChangeSet<NftId, NftProperty>) -> Result<(), LedgerError> {
        self.planned.clear();
        for entry in pending.iter() {
            let old_owner = entry
                .entity
                .as_ref()
                .map_or(AccountId::MISSING, |nft| nft.owner);
            match &entry.changes {
                None => self.planned.push(IndexOp::Remove {
                    nft: entry.id,
                    owner: old_owner,
                }),
                Some(changes) => {
                    if let Some(PropertyValue::Account(new_owner)) = changes.get(&NftProperty::Owner) {
                        if *new_owner != old_owner || entry.entity.is_none() {
                            self.planned.push(IndexOp::Move {
                                nft: entry.id,
                                from: old_owner,
                                to: *new_owner,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn post_commit(&mut self) -> Result<(), StoreError> {
        for op in std::mem::take(&mut self.planned) {
            match op {
                IndexOp::Move { nft, from, to } => {
                    self.index.unlink(from, nft);
                    self.index.link(to, nft);
                }
                IndexOp::Remove { nft, owner } => {
                    self.store.remove(&nft)?;
                    self.index.unlink(owner, nft);
                    debug!(nft = %nft, "serial removed");
                }
            }
        }
        Ok(())
    }

    fn completes_pending_removals(&self) -> bool {
        true
    }
}
