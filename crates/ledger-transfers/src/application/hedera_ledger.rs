//! # Hedera Ledger
//!
//! Facade over the four world ledgers. One transfer transaction runs as:
//!
//! ```text
//! begin(now) ──> transfer(..) / do_zero_sum(..) ──> commit() -> TransferRecord
//!                        │ Err(Failed(code))
//!                        └──────────────────────> rollback()
//! ```
//!
//! `commit` refuses pending state whose hbar or per-token deltas do not net
//! to zero and rolls every ledger back in that case. A ledger failing
//! mid-commit also rolls back every ledger still open.

use ledger_core::{BackingStore, LedgerError};
use ledger_telemetry::{metric_inc, TRANSFERS_PROCESSED};
use shared_types::{AccountId, NftId, PropertyValue, ResponseCode, TokenId, TokenRelKey};
use tracing::{debug, error, info, warn};

use crate::adapters::SeqNoEntityIdSource;
use crate::application::auto_creation::AutoCreationLogic;
use crate::application::transfer_logic::TransferLogic;
use crate::application::world_ledgers::{LedgerKind, WorldLedgers, WorldStores};
use crate::config::TransferConfig;
use crate::domain::{
    AccountAmount, AccountProperty, AliasManager, BalanceChange, ImpliedTransfers, NftProperty,
    PureTransferSemanticChecks, SideEffectsTracker, TokenProperty, TokenRelProperty,
    TokenTransferList, TransferRecord,
};
use crate::errors::TransferError;
use crate::interceptors::{hbar_deltas, token_deltas};
use crate::ports::EntityIdSource;

pub struct HederaLedger<E = SeqNoEntityIdSource> {
    world: WorldLedgers,
    aliases: AliasManager,
    auto_creation: AutoCreationLogic<E>,
    tracker: SideEffectsTracker,
    checks: PureTransferSemanticChecks,
    config: TransferConfig,
    consensus_now: i64,
}

impl HederaLedger<SeqNoEntityIdSource> {
    /// A ledger whose auto-created accounts are numbered after every account
    /// already in `stores`.
    pub fn new(stores: WorldStores, config: TransferConfig) -> Self {
        let ids = SeqNoEntityIdSource::following(stores.accounts.id_set());
        Self::with_id_source(stores, config, ids)
    }
}

impl<E: EntityIdSource> HederaLedger<E> {
    /// Alias links are rebuilt from the accounts in `stores`.
    pub fn with_id_source(stores: WorldStores, config: TransferConfig, ids: E) -> Self {
        let aliases = stores.accounts.with_read(|accounts| {
            AliasManager::rebuild(accounts.iter().map(|(id, account)| (id, &**account)))
        });
        debug!(aliases = aliases.len(), "alias links rebuilt from accounts");
        let auto_creation = AutoCreationLogic::new(ids, config.auto_renew_period_secs);
        Self {
            world: WorldLedgers::new(stores),
            aliases,
            auto_creation,
            tracker: SideEffectsTracker::new(),
            checks: PureTransferSemanticChecks,
            config,
            consensus_now: 0,
        }
    }

    // =========================================================================
    // TRANSACTION LIFECYCLE
    // =========================================================================

    /// Open a transaction on every ledger at consensus time `now`.
    ///
    /// A transaction left open by the previous caller is rolled back first.
    pub fn begin(&mut self, now: i64) {
        if self.world.are_in_transaction() {
            warn!(open = ?self.world.open_ledgers(), "begin with open ledgers, rolling back");
            self.rollback();
        }
        self.consensus_now = now;
        self.world.begin_all();
        debug!(now, "transfer transaction started");
    }

    /// Validate and marshal the transfer lists, then apply them.
    ///
    /// Returns the applied changes with every alias resolved. After an
    /// `Err(Failed(_))` from the application step the caller must `rollback`.
    pub fn transfer(
        &mut self,
        hbar_adjusts: &[AccountAmount],
        token_adjusts: &[TokenTransferList],
        payer: AccountId,
    ) -> Result<Vec<BalanceChange>, TransferError> {
        let implied = ImpliedTransfers::from_lists(
            hbar_adjusts,
            token_adjusts,
            payer,
            &self.config,
            &self.checks,
        );
        if !implied.is_ok() {
            metric_inc!(TRANSFERS_PROCESSED, &["rejected"]);
            debug!(payer = %payer, code = %implied.code, "transfer lists rejected");
            return Err(TransferError::Failed(implied.code));
        }

        let mut changes = implied.changes;
        self.do_zero_sum(&mut changes)?;
        Ok(changes)
    }

    pub fn do_zero_sum(&mut self, changes: &mut [BalanceChange]) -> Result<(), TransferError> {
        if !self.world.are_in_transaction() {
            return Err(LedgerError::NoActiveTransaction {
                ledger: "world".into(),
                operation: "do_zero_sum",
            }
            .into());
        }
        let result = TransferLogic::new(
            &mut self.world,
            &mut self.aliases,
            &mut self.auto_creation,
            &mut self.tracker,
            &self.config,
            self.consensus_now,
        )
        .do_zero_sum(changes);
        if let Err(TransferError::Failed(_)) = &result {
            metric_inc!(TRANSFERS_PROCESSED, &["rejected"]);
        }
        result
    }

    /// Commit every ledger and return what the transaction did.
    pub fn commit(&mut self) -> Result<TransferRecord, TransferError> {
        if !self.world.are_in_transaction() {
            return Err(LedgerError::NoActiveTransaction {
                ledger: "world".into(),
                operation: "commit",
            }
            .into());
        }

        let hbar_net = hbar_deltas(&self.world.accounts.pending_change_set())
            .values()
            .fold(0i64, |net, delta| net.saturating_add(*delta));
        let unbalanced_tokens: Vec<TokenId> =
            token_deltas(&self.world.token_rels.pending_change_set())
                .into_iter()
                .filter(|(_, by_account)| {
                    by_account
                        .values()
                        .fold(0i64, |net, delta| net.saturating_add(*delta))
                        != 0
                })
                .map(|(token, _)| token)
                .collect();
        if hbar_net != 0 || !unbalanced_tokens.is_empty() {
            error!(
                hbar_net,
                unbalanced_tokens = ?unbalanced_tokens,
                "pending adjustments do not net to zero, rolling back"
            );
            self.rollback();
            return Err(TransferError::InconsistentAdjustments {
                hbar_net,
                unbalanced_tokens,
            });
        }

        let mut committed = Vec::with_capacity(LedgerKind::COMMIT_ORDER.len());
        for kind in LedgerKind::COMMIT_ORDER {
            self.commit_ledger(kind, &mut committed)?;
        }

        let record = TransferRecord {
            hbar_adjustments: self.world.accounts.interceptor_mut().drain_adjustments(),
            token_adjustments: self.world.token_rels.interceptor_mut().drain_adjustments(),
            nft_ownership_changes: self.tracker.nft_ownership_changes().to_vec(),
            auto_created: self.tracker.auto_created().to_vec(),
        };
        self.tracker.reset();

        metric_inc!(TRANSFERS_PROCESSED, &["committed"]);
        info!(
            accounts = record.hbar_adjustments.len(),
            tokens = record.token_adjustments.len(),
            nft_moves = record.nft_ownership_changes.len(),
            auto_created = record.auto_created.len(),
            "transfer transaction committed"
        );
        Ok(record)
    }

    /// Commit one ledger, rolling back every ledger still open if it fails.
    fn commit_ledger(
        &mut self,
        kind: LedgerKind,
        committed: &mut Vec<String>,
    ) -> Result<(), TransferError> {
        if !self.world.is_open(kind) {
            return Ok(());
        }
        let name = self.world.name_of(kind).to_string();
        match self.world.commit(kind) {
            Ok(()) => {
                if kind == LedgerKind::Accounts {
                    // Auto-created accounts are stored now; keep their ids and links.
                    self.auto_creation.reset();
                }
                committed.push(name);
                Ok(())
            }
            Err(source) => {
                error!(
                    ledger = %name,
                    committed = ?committed,
                    error = %source,
                    "ledger failed mid-commit, rolling back the rest"
                );
                self.rollback();
                Err(TransferError::PartialCommit {
                    committed: std::mem::take(committed),
                    failed: name,
                    source,
                })
            }
        }
    }

    /// Roll back every open ledger and forget pending auto-creations.
    pub fn rollback(&mut self) {
        self.world.rollback_all();
        if self.auto_creation.reclaim_pending_aliases(&mut self.aliases) {
            debug!("auto-created accounts of the rolled back transaction reclaimed");
        }
        self.tracker.reset();
        metric_inc!(TRANSFERS_PROCESSED, &["rolled_back"]);
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn balance_of(&self, account: AccountId) -> Result<i64, LedgerError> {
        Ok(self
            .world
            .accounts
            .get(&account, AccountProperty::Balance)?
            .as_long()
            .unwrap_or_default())
    }

    pub fn token_balance_of(&self, account: AccountId, token: TokenId) -> Result<i64, LedgerError> {
        Ok(self
            .world
            .token_rels
            .get(&TokenRelKey::new(account, token), TokenRelProperty::TokenBalance)?
            .as_long()
            .unwrap_or_default())
    }

    /// Owner of `nft`, with treasury ownership resolved to the treasury id.
    pub fn owner_of(&self, nft: NftId) -> Result<AccountId, LedgerError> {
        let owner = self
            .world
            .nfts
            .get(&nft, NftProperty::Owner)?
            .as_account()
            .unwrap_or(AccountId::MISSING);
        if !owner.is_missing() {
            return Ok(owner);
        }
        Ok(self
            .world
            .tokens
            .get(&nft.token, TokenProperty::Treasury)?
            .as_account()
            .unwrap_or(AccountId::MISSING))
    }

    pub fn exists(&self, account: AccountId) -> bool {
        self.world.accounts.exists(&account)
    }

    /// Add `delta` tinybars to `account` outside any transfer list.
    pub fn adjust_balance(&mut self, account: AccountId, delta: i64) -> Result<(), TransferError> {
        let balance = self.balance_of(account)?;
        let Some(new_balance) = balance.checked_add(delta).filter(|b| *b >= 0) else {
            return Err(TransferError::Failed(ResponseCode::InsufficientAccountBalance));
        };
        self.world.accounts.set(
            &account,
            AccountProperty::Balance,
            PropertyValue::Long(new_balance),
        )?;
        Ok(())
    }

    pub fn world(&self) -> &WorldLedgers {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldLedgers {
        &mut self.world
    }

    pub fn aliases(&self) -> &AliasManager {
        &self.aliases
    }

    pub fn aliases_mut(&mut self) -> &mut AliasManager {
        &mut self.aliases
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    pub fn consensus_now(&self) -> i64 {
        self.consensus_now
    }
}
