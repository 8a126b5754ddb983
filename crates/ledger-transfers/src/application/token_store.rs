//! # Token Store
//!
//! Validates and applies a single token change across the token, token
//! relationship, NFT and account ledgers. Domain failures come back as
//! response codes; only ledger misuse is an `Err`.

use ledger_core::LedgerError;
use shared_types::{
    AccountId, FungibleAllowanceId, NftAllowanceId, PropertyValue, ResponseCode, TokenId,
    TokenRelKey,
};
use tracing::debug;

use crate::application::world_ledgers::WorldLedgers;
use crate::domain::scoped_checks::{
    AccountScopedCheck, NftOwnershipCheck, TokenCheck, TokenRelScopedCheck,
};
use crate::domain::{
    AccountProperty, BalanceChange, NftProperty, SideEffectsTracker, TokenProperty,
    TokenRelProperty,
};

pub struct TokenStore<'a> {
    world: &'a mut WorldLedgers,
    tracker: &'a mut SideEffectsTracker,
    now: i64,
    expiry_enforced: bool,
}

impl<'a> TokenStore<'a> {
    pub fn new(
        world: &'a mut WorldLedgers,
        tracker: &'a mut SideEffectsTracker,
        now: i64,
        expiry_enforced: bool,
    ) -> Self {
        Self {
            world,
            tracker,
            now,
            expiry_enforced,
        }
    }

    /// Check `change` against the token and its relationships, then apply it.
    ///
    /// Nothing is written unless the result is `OK`.
    pub fn try_token_change(&mut self, change: &BalanceChange) -> Result<ResponseCode, LedgerError> {
        let Some(token) = change.token else {
            return Ok(ResponseCode::InvalidTokenId);
        };
        let code = self
            .world
            .tokens
            .validate(&token, &TokenCheck::for_change(change));
        if code != ResponseCode::Ok {
            return Ok(code);
        }
        let Some(account) = change.account_id() else {
            return Ok(ResponseCode::InvalidAccountId);
        };

        if change.is_nft() {
            self.change_owner(change, token, account)
        } else {
            self.adjust_units(change, token, account)
        }
    }

    fn adjust_units(
        &mut self,
        change: &BalanceChange,
        token: TokenId,
        account: AccountId,
    ) -> Result<ResponseCode, LedgerError> {
        let key = TokenRelKey::new(account, token);
        let code = self
            .world
            .token_rels
            .validate(&key, &TokenRelScopedCheck { units: change.units });
        if code != ResponseCode::Ok {
            return Ok(code);
        }

        if change.is_approval && change.allowance_units < 0 {
            let allowance_id = FungibleAllowanceId {
                token,
                spender: change.payer,
            };
            let allowance = match self
                .world
                .accounts
                .get(&account, AccountProperty::FungibleTokenAllowances)?
            {
                PropertyValue::FungibleAllowances(allowances) => allowances.get(&allowance_id).copied(),
                _ => None,
            };
            match allowance {
                None => return Ok(ResponseCode::SpenderDoesNotHaveAllowance),
                Some(amount) if amount < -change.allowance_units => {
                    return Ok(ResponseCode::AmountExceedsAllowance)
                }
                Some(_) => {}
            }
        }

        self.adjust_rel_balance(key, change.units)?;
        Ok(ResponseCode::Ok)
    }

    fn change_owner(
        &mut self,
        change: &BalanceChange,
        token: TokenId,
        sender: AccountId,
    ) -> Result<ResponseCode, LedgerError> {
        let (Some(receiver), Some(nft)) = (change.counterparty_id(), change.nft_id()) else {
            return Ok(ResponseCode::InvalidAccountId);
        };

        let receiver_check = AccountScopedCheck {
            is_hbar: false,
            ..AccountScopedCheck::for_change(change, self.now, self.expiry_enforced)
        };
        let code = self.world.accounts.validate(&receiver, &receiver_check);
        if code != ResponseCode::Ok {
            return Ok(code);
        }

        let treasury = self
            .world
            .tokens
            .get(&token, TokenProperty::Treasury)?
            .as_account()
            .unwrap_or_default();
        let approved_for_all = match self
            .world
            .accounts
            .get(&sender, AccountProperty::ApproveForAllNftAllowances)?
        {
            PropertyValue::NftOperators(operators) => operators.contains(&NftAllowanceId {
                token,
                operator: change.payer,
            }),
            _ => false,
        };
        let ownership = NftOwnershipCheck {
            sender,
            treasury,
            payer: change.payer,
            is_approval: change.is_approval,
            approved_for_all,
        };
        let code = self.world.nfts.validate(&nft, &ownership);
        if code != ResponseCode::Ok {
            return Ok(code);
        }

        let from = TokenRelKey::new(sender, token);
        let to = TokenRelKey::new(receiver, token);
        for (key, units) in [(from, -1), (to, 1)] {
            let code = self
                .world
                .token_rels
                .validate(&key, &TokenRelScopedCheck { units });
            if code != ResponseCode::Ok {
                return Ok(code);
            }
        }

        let new_owner = if receiver == treasury {
            AccountId::MISSING
        } else {
            receiver
        };
        self.world.nfts.set(&nft, NftProperty::Owner, new_owner)?;
        self.world
            .nfts
            .set(&nft, NftProperty::Spender, AccountId::MISSING)?;
        self.adjust_rel_balance(from, -1)?;
        self.adjust_rel_balance(to, 1)?;
        self.adjust_account_long(sender, AccountProperty::NumNftsOwned, -1)?;
        self.adjust_account_long(receiver, AccountProperty::NumNftsOwned, 1)?;
        self.tracker.track_nft_ownership_change(nft, sender, receiver);

        debug!(nft = %nft, from = %sender, to = %receiver, "nft ownership changed");
        Ok(ResponseCode::Ok)
    }

    fn adjust_rel_balance(&mut self, key: TokenRelKey, delta: i64) -> Result<(), LedgerError> {
        let balance = self
            .world
            .token_rels
            .get(&key, TokenRelProperty::TokenBalance)?
            .as_long()
            .unwrap_or_default();
        self.world
            .token_rels
            .set(&key, TokenRelProperty::TokenBalance, balance + delta)
    }

    fn adjust_account_long(
        &mut self,
        account: AccountId,
        property: AccountProperty,
        delta: i64,
    ) -> Result<(), LedgerError> {
        let current = self
            .world
            .accounts
            .get(&account, property)?
            .as_long()
            .unwrap_or_default();
        self.world.accounts.set(&account, property, current + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::world_ledgers::WorldStores;
    use shared_types::{Account, Token, TokenRelationship, TokenType, UniqueToken};
    use std::collections::{BTreeMap, BTreeSet};

    const NOW: i64 = 1_000;
    const PAYER: AccountId = AccountId(2);
    const TREASURY: AccountId = AccountId(98);
    const ALICE: AccountId = AccountId(1001);
    const BOB: AccountId = AccountId(1002);
    const FT: TokenId = TokenId(5000);
    const NFT: TokenId = TokenId(6000);

    fn account(balance: i64) -> Account {
        Account {
            balance,
            expiry: NOW + 1_000,
            ..Default::default()
        }
    }

    fn rel(balance: i64) -> TokenRelationship {
        TokenRelationship {
            balance,
            is_kyc_granted: true,
            ..Default::default()
        }
    }

    fn world() -> WorldLedgers {
        let stores = WorldStores::default();
        for id in [TREASURY, ALICE, BOB] {
            stores.accounts.insert(id, account(100));
        }
        stores.tokens.insert(
            FT,
            Token {
                treasury: TREASURY,
                decimals: 2,
                ..Default::default()
            },
        );
        stores.tokens.insert(
            NFT,
            Token {
                treasury: TREASURY,
                token_type: TokenType::NonFungibleUnique,
                ..Default::default()
            },
        );
        for id in [TREASURY, ALICE, BOB] {
            stores.token_rels.insert(TokenRelKey::new(id, FT), rel(10));
            stores.token_rels.insert(TokenRelKey::new(id, NFT), rel(1));
        }
        stores.nfts.insert(
            NFT.nft(1),
            UniqueToken {
                owner: ALICE,
                ..Default::default()
            },
        );
        stores.nfts.insert(NFT.nft(2), UniqueToken::default());
        let mut world = WorldLedgers::new(stores);
        world.begin_all();
        world
    }

    fn rel_balance(world: &WorldLedgers, account: AccountId, token: TokenId) -> i64 {
        world
            .token_rels
            .get(&TokenRelKey::new(account, token), TokenRelProperty::TokenBalance)
            .unwrap()
            .as_long()
            .unwrap()
    }

    #[test]
    fn test_fungible_adjustment() {
        let mut world = world();
        let mut tracker = SideEffectsTracker::new();
        let mut store = TokenStore::new(&mut world, &mut tracker, NOW, true);

        let debit = BalanceChange::token_adjust(FT, ALICE, -4, PAYER);
        assert_eq!(store.try_token_change(&debit).unwrap(), ResponseCode::Ok);
        let overdraw = BalanceChange::token_adjust(FT, BOB, -11, PAYER);
        assert_eq!(
            store.try_token_change(&overdraw).unwrap(),
            ResponseCode::InsufficientTokenBalance
        );

        assert_eq!(rel_balance(&world, ALICE, FT), 6);
        assert_eq!(rel_balance(&world, BOB, FT), 10);
    }

    #[test]
    fn test_token_and_relationship_failures() {
        let mut world = world();
        let mut tracker = SideEffectsTracker::new();
        let mut store = TokenStore::new(&mut world, &mut tracker, NOW, true);

        let unknown = BalanceChange::token_adjust(TokenId(1), ALICE, 1, PAYER);
        assert_eq!(
            store.try_token_change(&unknown).unwrap(),
            ResponseCode::InvalidTokenId
        );
        let unassociated = BalanceChange::token_adjust(FT, AccountId(7), 1, PAYER);
        assert_eq!(
            store.try_token_change(&unassociated).unwrap(),
            ResponseCode::TokenNotAssociatedToAccount
        );
        let wrong_decimals =
            BalanceChange::token_adjust(FT, ALICE, 1, PAYER).with_expected_decimals(Some(3));
        assert_eq!(
            store.try_token_change(&wrong_decimals).unwrap(),
            ResponseCode::UnexpectedTokenDecimals
        );
        let units_of_nft = BalanceChange::token_adjust(NFT, ALICE, 1, PAYER);
        assert_eq!(
            store.try_token_change(&units_of_nft).unwrap(),
            ResponseCode::AccountAmountTransfersOnlyAllowedForFungibleCommon
        );
    }

    #[test]
    fn test_fungible_allowance() {
        let mut world = world();
        let allowance_id = FungibleAllowanceId {
            token: FT,
            spender: PAYER,
        };
        world
            .accounts
            .set(
                &ALICE,
                AccountProperty::FungibleTokenAllowances,
                PropertyValue::FungibleAllowances(BTreeMap::from([(allowance_id, 3)])),
            )
            .unwrap();
        let mut tracker = SideEffectsTracker::new();
        let mut store = TokenStore::new(&mut world, &mut tracker, NOW, true);

        let too_much = BalanceChange::token_adjust(FT, ALICE, -4, PAYER).approved();
        assert_eq!(
            store.try_token_change(&too_much).unwrap(),
            ResponseCode::AmountExceedsAllowance
        );
        let no_grant = BalanceChange::token_adjust(FT, BOB, -1, PAYER).approved();
        assert_eq!(
            store.try_token_change(&no_grant).unwrap(),
            ResponseCode::SpenderDoesNotHaveAllowance
        );
        let within = BalanceChange::token_adjust(FT, ALICE, -3, PAYER).approved();
        assert_eq!(store.try_token_change(&within).unwrap(), ResponseCode::Ok);
    }

    #[test]
    fn test_nft_move() {
        let mut world = world();
        let mut tracker = SideEffectsTracker::new();
        let mut store = TokenStore::new(&mut world, &mut tracker, NOW, true);

        let change = BalanceChange::nft_move(NFT.nft(1), ALICE, BOB, PAYER);
        assert_eq!(store.try_token_change(&change).unwrap(), ResponseCode::Ok);

        assert_eq!(
            world.nfts.get(&NFT.nft(1), NftProperty::Owner).unwrap(),
            PropertyValue::Account(BOB)
        );
        assert_eq!(rel_balance(&world, ALICE, NFT), 0);
        assert_eq!(rel_balance(&world, BOB, NFT), 2);
        assert_eq!(
            world.accounts.get(&BOB, AccountProperty::NumNftsOwned).unwrap(),
            PropertyValue::Long(1)
        );
        assert_eq!(tracker.nft_ownership_changes().len(), 1);
    }

    #[test]
    fn test_nft_move_to_treasury_clears_owner() {
        let mut world = world();
        let mut tracker = SideEffectsTracker::new();
        let mut store = TokenStore::new(&mut world, &mut tracker, NOW, true);

        let change = BalanceChange::nft_move(NFT.nft(1), ALICE, TREASURY, PAYER);
        assert_eq!(store.try_token_change(&change).unwrap(), ResponseCode::Ok);
        assert_eq!(
            world.nfts.get(&NFT.nft(1), NftProperty::Owner).unwrap(),
            PropertyValue::Account(AccountId::MISSING)
        );
    }

    #[test]
    fn test_nft_ownership_failures() {
        let mut world = world();
        let mut tracker = SideEffectsTracker::new();
        let mut store = TokenStore::new(&mut world, &mut tracker, NOW, true);

        let not_owner = BalanceChange::nft_move(NFT.nft(1), BOB, ALICE, PAYER);
        assert_eq!(
            store.try_token_change(&not_owner).unwrap(),
            ResponseCode::SenderDoesNotOwnNftSerialNo
        );
        let missing = BalanceChange::nft_move(NFT.nft(9), ALICE, BOB, PAYER);
        assert_eq!(
            store.try_token_change(&missing).unwrap(),
            ResponseCode::InvalidNftId
        );
        let on_fungible = BalanceChange::nft_move(FT.nft(1), ALICE, BOB, PAYER);
        assert_eq!(
            store.try_token_change(&on_fungible).unwrap(),
            ResponseCode::InvalidNftId
        );
        let unapproved = BalanceChange::nft_move(NFT.nft(1), ALICE, BOB, PAYER).approved();
        assert_eq!(
            store.try_token_change(&unapproved).unwrap(),
            ResponseCode::SpenderDoesNotHaveAllowance
        );
        assert!(tracker.nft_ownership_changes().is_empty());
    }

    #[test]
    fn test_nft_operator_approval() {
        let mut world = world();
        world
            .accounts
            .set(
                &ALICE,
                AccountProperty::ApproveForAllNftAllowances,
                PropertyValue::NftOperators(BTreeSet::from([NftAllowanceId {
                    token: NFT,
                    operator: PAYER,
                }])),
            )
            .unwrap();
        let mut tracker = SideEffectsTracker::new();
        let mut store = TokenStore::new(&mut world, &mut tracker, NOW, true);

        let approved = BalanceChange::nft_move(NFT.nft(1), ALICE, BOB, PAYER).approved();
        assert_eq!(store.try_token_change(&approved).unwrap(), ResponseCode::Ok);
    }

    #[test]
    fn test_treasury_sends_unowned_serial() {
        let mut world = world();
        let mut tracker = SideEffectsTracker::new();
        let mut store = TokenStore::new(&mut world, &mut tracker, NOW, true);

        let change = BalanceChange::nft_move(NFT.nft(2), TREASURY, ALICE, PAYER);
        assert_eq!(store.try_token_change(&change).unwrap(), ResponseCode::Ok);
        assert_eq!(
            world.nfts.get(&NFT.nft(2), NftProperty::Owner).unwrap(),
            PropertyValue::Account(ALICE)
        );
    }
}
