//! # Zero-Sum Application
//!
//! Applies a batch of balance changes inside the open multi-ledger
//! transaction:
//!
//! 1. resolve aliases, auto-creating accounts for unseen credited aliases
//! 2. check the account behind each change
//! 3. check and apply each token change through `TokenStore`
//! 4. on success, write hbar balances and spend used allowances
//!
//! The first failing change stops the batch. Token-side pending changes and
//! pending auto-creations are then dropped and the code is returned as
//! `TransferError::Failed`; the caller must roll back every ledger.

use ledger_core::LedgerError;
use ledger_telemetry::log_transfer_event;
use shared_types::{AccountId, Alias, FungibleAllowanceId, PropertyValue, ResponseCode};

use crate::application::auto_creation::AutoCreationLogic;
use crate::application::token_store::TokenStore;
use crate::application::world_ledgers::WorldLedgers;
use crate::config::TransferConfig;
use crate::domain::scoped_checks::AccountScopedCheck;
use crate::domain::{AccountProperty, AliasManager, BalanceChange, SideEffectsTracker};
use crate::errors::TransferError;
use crate::ports::EntityIdSource;

pub struct TransferLogic<'a, E> {
    world: &'a mut WorldLedgers,
    aliases: &'a mut AliasManager,
    auto_creation: &'a mut AutoCreationLogic<E>,
    tracker: &'a mut SideEffectsTracker,
    config: &'a TransferConfig,
    now: i64,
}

impl<'a, E: EntityIdSource> TransferLogic<'a, E> {
    pub fn new(
        world: &'a mut WorldLedgers,
        aliases: &'a mut AliasManager,
        auto_creation: &'a mut AutoCreationLogic<E>,
        tracker: &'a mut SideEffectsTracker,
        config: &'a TransferConfig,
        now: i64,
    ) -> Self {
        Self {
            world,
            aliases,
            auto_creation,
            tracker,
            config,
            now,
        }
    }

    /// Apply `changes`, resolving their aliases in place.
    pub fn do_zero_sum(&mut self, changes: &mut [BalanceChange]) -> Result<(), TransferError> {
        let mut validity = ResponseCode::Ok;
        for change in changes.iter_mut() {
            validity = self.resolve_aliases(change)?;
            if validity != ResponseCode::Ok {
                break;
            }
            validity = self.check_account(change);
            if validity != ResponseCode::Ok {
                break;
            }
            if change.token.is_some() {
                let mut tokens = TokenStore::new(
                    &mut *self.world,
                    &mut *self.tracker,
                    self.now,
                    self.config.expiry_enforced,
                );
                validity = tokens.try_token_change(change)?;
                if validity != ResponseCode::Ok {
                    break;
                }
            }
        }

        if validity == ResponseCode::Ok {
            self.apply_hbar_and_allowances(changes)?;
            return Ok(());
        }

        self.drop_token_changes()?;
        if self.auto_creation.reclaim_pending_aliases(self.aliases) {
            self.world.accounts.undo_creations()?;
        }
        let payer = changes.first().map(|c| c.payer).unwrap_or_default();
        log_transfer_event!(warn, "zero-sum transfer rejected", payer, code = %validity);
        Err(TransferError::Failed(validity))
    }

    fn resolve_aliases(&mut self, change: &mut BalanceChange) -> Result<ResponseCode, LedgerError> {
        if let Some(alias) = change.account.alias().cloned() {
            match self.resolve(&alias, change.is_debit())? {
                Ok(id) => change.replace_alias_with(id),
                Err(code) => return Ok(code),
            }
        }
        if let Some(alias) = change.counterparty_alias().cloned() {
            match self.resolve(&alias, false)? {
                Ok(id) => change.replace_counterparty_alias_with(id),
                Err(code) => return Ok(code),
            }
        }
        Ok(ResponseCode::Ok)
    }

    /// The account behind `alias`, creating it for a credit if auto-creation
    /// is on.
    fn resolve(
        &mut self,
        alias: &Alias,
        is_debit: bool,
    ) -> Result<Result<AccountId, ResponseCode>, LedgerError> {
        if let Some(id) = self.aliases.lookup(alias) {
            return Ok(Ok(id));
        }
        if !self.config.auto_creation_enabled {
            return Ok(Err(ResponseCode::NotSupported));
        }
        if is_debit {
            return Ok(Err(ResponseCode::InvalidAccountId));
        }
        let id = self.auto_creation.create(
            alias,
            &mut self.world.accounts,
            self.aliases,
            self.tracker,
            self.now,
        )?;
        Ok(Ok(id))
    }

    fn check_account(&self, change: &BalanceChange) -> ResponseCode {
        let Some(account) = change.account_id() else {
            return ResponseCode::InvalidAccountId;
        };
        let check = AccountScopedCheck::for_change(change, self.now, self.config.expiry_enforced);
        self.world.accounts.validate(&account, &check)
    }

    fn apply_hbar_and_allowances(&mut self, changes: &[BalanceChange]) -> Result<(), LedgerError> {
        for change in changes {
            let Some(account) = change.account_id() else {
                return Err(LedgerError::IllegalState(format!(
                    "unresolved account in applied change {}",
                    change
                )));
            };
            let spends_allowance = change.is_approval && change.allowance_units < 0;

            if change.is_hbar() {
                let balance = self
                    .world
                    .accounts
                    .get(&account, AccountProperty::Balance)?
                    .as_long()
                    .unwrap_or_default();
                self.world
                    .accounts
                    .set(&account, AccountProperty::Balance, balance + change.units)?;
                if spends_allowance {
                    self.spend_crypto_allowance(account, change.payer, -change.allowance_units)?;
                }
            } else if change.is_fungible_token() && spends_allowance {
                self.spend_fungible_allowance(account, change, -change.allowance_units)?;
            }
        }
        Ok(())
    }

    fn spend_crypto_allowance(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        amount: i64,
    ) -> Result<(), LedgerError> {
        let PropertyValue::CryptoAllowances(mut allowances) = self
            .world
            .accounts
            .get(&owner, AccountProperty::CryptoAllowances)?
        else {
            return Ok(());
        };
        if let Some(remaining) = allowances.get_mut(&spender) {
            *remaining -= amount;
            if *remaining <= 0 {
                allowances.remove(&spender);
            }
        }
        self.world.accounts.set(
            &owner,
            AccountProperty::CryptoAllowances,
            PropertyValue::CryptoAllowances(allowances),
        )
    }

    fn spend_fungible_allowance(
        &mut self,
        owner: AccountId,
        change: &BalanceChange,
        amount: i64,
    ) -> Result<(), LedgerError> {
        let Some(token) = change.token else {
            return Ok(());
        };
        let PropertyValue::FungibleAllowances(mut allowances) = self
            .world
            .accounts
            .get(&owner, AccountProperty::FungibleTokenAllowances)?
        else {
            return Ok(());
        };
        let id = FungibleAllowanceId {
            token,
            spender: change.payer,
        };
        if let Some(remaining) = allowances.get_mut(&id) {
            *remaining -= amount;
            if *remaining <= 0 {
                allowances.remove(&id);
            }
        }
        self.world.accounts.set(
            &owner,
            AccountProperty::FungibleTokenAllowances,
            PropertyValue::FungibleAllowances(allowances),
        )
    }

    /// Forget every pending token-side change of the open transaction.
    fn drop_token_changes(&mut self) -> Result<(), LedgerError> {
        if self.world.token_rels.is_in_transaction() {
            self.world.token_rels.rollback()?;
            self.world.token_rels.begin();
        }
        if self.world.nfts.is_in_transaction() {
            self.world.nfts.rollback()?;
            self.world.nfts.begin();
        }
        if self.world.accounts.is_in_transaction() {
            self.world.accounts.undo_changes_of_type(&[
                AccountProperty::NumNftsOwned,
                AccountProperty::NumAssociations,
            ])?;
        }
        self.tracker.reset_token_changes();
        Ok(())
    }
}
