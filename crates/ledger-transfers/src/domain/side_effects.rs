//! # Side Effects
//!
//! What a zero-sum application did beyond balance arithmetic, accumulated
//! while the transaction is open and handed back to the caller on commit.

use std::collections::BTreeMap;

use shared_types::{AccountId, Alias, NftId, TokenId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NftOwnershipChange {
    pub nft: NftId,
    pub from: AccountId,
    pub to: AccountId,
}

#[derive(Debug, Default, Clone)]
pub struct SideEffectsTracker {
    auto_created: Vec<(Alias, AccountId)>,
    nft_ownership_changes: Vec<NftOwnershipChange>,
}

impl SideEffectsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_auto_creation(&mut self, alias: Alias, id: AccountId) {
        self.auto_created.push((alias, id));
    }

    pub fn track_nft_ownership_change(&mut self, nft: NftId, from: AccountId, to: AccountId) {
        self.nft_ownership_changes
            .push(NftOwnershipChange { nft, from, to });
    }

    pub fn auto_created(&self) -> &[(Alias, AccountId)] {
        &self.auto_created
    }

    pub fn nft_ownership_changes(&self) -> &[NftOwnershipChange] {
        &self.nft_ownership_changes
    }

    /// Forget token-side effects after their ledger changes were dropped.
    pub fn reset_token_changes(&mut self) {
        self.nft_ownership_changes.clear();
    }

    pub fn reset(&mut self) {
        self.auto_created.clear();
        self.nft_ownership_changes.clear();
    }
}

/// Net effect of one committed transfer transaction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    pub hbar_adjustments: BTreeMap<AccountId, i64>,
    pub token_adjustments: BTreeMap<TokenId, BTreeMap<AccountId, i64>>,
    pub nft_ownership_changes: Vec<NftOwnershipChange>,
    pub auto_created: Vec<(Alias, AccountId)>,
}

impl TransferRecord {
    pub fn is_empty(&self) -> bool {
        self.hbar_adjustments.is_empty()
            && self.token_adjustments.is_empty()
            && self.nft_ownership_changes.is_empty()
            && self.auto_created.is_empty()
    }

    pub fn hbar_adjustment(&self, account: AccountId) -> i64 {
        self.hbar_adjustments.get(&account).copied().unwrap_or_default()
    }

    pub fn token_adjustment(&self, token: TokenId, account: AccountId) -> i64 {
        self.token_adjustments
            .get(&token)
            .and_then(|by_account| by_account.get(&account))
            .copied()
            .unwrap_or_default()
    }
}
