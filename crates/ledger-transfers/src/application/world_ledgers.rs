//! # World Ledgers
//!
//! The four ledgers a transfer touches, opened and closed together.

use ledger_core::{LedgerError, NoopCommitInterceptor, SharedStore, TransactionalLedger};
use shared_types::{
    Account, AccountId, NftId, Token, TokenId, TokenRelKey, TokenRelationship, UniqueToken,
};
use tracing::warn;

use crate::domain::{AccountProperty, NftProperty, TokenProperty, TokenRelProperty};
use crate::interceptors::{
    AccountsCommitInterceptor, TokenRelsCommitInterceptor, UniqueTokensCommitInterceptor,
};

pub type AccountsLedger = TransactionalLedger<
    AccountId,
    AccountProperty,
    SharedStore<AccountId, Account>,
    AccountsCommitInterceptor,
>;

pub type TokenRelsLedger = TransactionalLedger<
    TokenRelKey,
    TokenRelProperty,
    SharedStore<TokenRelKey, TokenRelationship>,
    TokenRelsCommitInterceptor,
>;

pub type NftsLedger = TransactionalLedger<
    NftId,
    NftProperty,
    SharedStore<NftId, UniqueToken>,
    UniqueTokensCommitInterceptor,
>;

pub type TokensLedger =
    TransactionalLedger<TokenId, TokenProperty, SharedStore<TokenId, Token>, NoopCommitInterceptor>;

/// One of the four world ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    Accounts,
    TokenRels,
    Nfts,
    Tokens,
}

impl LedgerKind {
    /// Order in which a transfer commits the ledgers.
    pub const COMMIT_ORDER: [LedgerKind; 4] = [
        LedgerKind::Accounts,
        LedgerKind::TokenRels,
        LedgerKind::Nfts,
        LedgerKind::Tokens,
    ];
}

/// Handles onto the four backing stores. Clones share the same entities.
#[derive(Debug, Default, Clone)]
pub struct WorldStores {
    pub accounts: SharedStore<AccountId, Account>,
    pub token_rels: SharedStore<TokenRelKey, TokenRelationship>,
    pub nfts: SharedStore<NftId, UniqueToken>,
    pub tokens: SharedStore<TokenId, Token>,
}

#[derive(Debug)]
pub struct WorldLedgers {
    pub accounts: AccountsLedger,
    pub token_rels: TokenRelsLedger,
    pub nfts: NftsLedger,
    pub tokens: TokensLedger,
}

impl WorldLedgers {
    pub fn new(stores: WorldStores) -> Self {
        let nfts_interceptor = UniqueTokensCommitInterceptor::new(stores.nfts.clone());
        Self {
            accounts: AccountsLedger::with_interceptor(
                "accounts",
                stores.accounts,
                AccountsCommitInterceptor::new(),
            ),
            token_rels: TokenRelsLedger::with_interceptor(
                "token_rels",
                stores.token_rels,
                TokenRelsCommitInterceptor::new(),
            ),
            nfts: NftsLedger::with_interceptor("nfts", stores.nfts, nfts_interceptor),
            tokens: TokensLedger::new("tokens", stores.tokens),
        }
    }

    /// Ledgers over fresh, empty stores.
    pub fn in_memory() -> Self {
        Self::new(WorldStores::default())
    }

    /// Handles onto the stores behind each ledger.
    pub fn stores(&self) -> WorldStores {
        WorldStores {
            accounts: self.accounts.store().clone(),
            token_rels: self.token_rels.store().clone(),
            nfts: self.nfts.store().clone(),
            tokens: self.tokens.store().clone(),
        }
    }

    pub fn name_of(&self, kind: LedgerKind) -> &str {
        match kind {
            LedgerKind::Accounts => self.accounts.name(),
            LedgerKind::TokenRels => self.token_rels.name(),
            LedgerKind::Nfts => self.nfts.name(),
            LedgerKind::Tokens => self.tokens.name(),
        }
    }

    pub fn is_open(&self, kind: LedgerKind) -> bool {
        match kind {
            LedgerKind::Accounts => self.accounts.is_in_transaction(),
            LedgerKind::TokenRels => self.token_rels.is_in_transaction(),
            LedgerKind::Nfts => self.nfts.is_in_transaction(),
            LedgerKind::Tokens => self.tokens.is_in_transaction(),
        }
    }

    pub fn commit(&mut self, kind: LedgerKind) -> Result<(), LedgerError> {
        match kind {
            LedgerKind::Accounts => self.accounts.commit(),
            LedgerKind::TokenRels => self.token_rels.commit(),
            LedgerKind::Nfts => self.nfts.commit(),
            LedgerKind::Tokens => self.tokens.commit(),
        }
    }

    pub fn begin_all(&mut self) {
        self.accounts.begin();
        self.token_rels.begin();
        self.nfts.begin();
        self.tokens.begin();
    }

    /// Roll back every ledger still in a transaction.
    pub fn rollback_all(&mut self) {
        if self.accounts.is_in_transaction() {
            log_rollback_failure(self.accounts.rollback());
        }
        if self.token_rels.is_in_transaction() {
            log_rollback_failure(self.token_rels.rollback());
        }
        if self.nfts.is_in_transaction() {
            log_rollback_failure(self.nfts.rollback());
        }
        if self.tokens.is_in_transaction() {
            log_rollback_failure(self.tokens.rollback());
        }
    }

    /// True if any ledger has an open transaction.
    pub fn are_in_transaction(&self) -> bool {
        LedgerKind::COMMIT_ORDER
            .into_iter()
            .any(|kind| self.is_open(kind))
    }

    /// Names of the ledgers with an open transaction.
    pub fn open_ledgers(&self) -> Vec<&str> {
        LedgerKind::COMMIT_ORDER
            .into_iter()
            .filter(|kind| self.is_open(*kind))
            .map(|kind| self.name_of(kind))
            .collect()
    }
}

fn log_rollback_failure(result: Result<(), LedgerError>) {
    if let Err(e) = result {
        warn!(error = %e, "rollback of open ledger failed");
    }
}
