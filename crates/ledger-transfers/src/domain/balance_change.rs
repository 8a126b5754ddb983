//! # Balance Changes
//!
//! One signed adjustment to apply: hbar, fungible units of one token, or the
//! move of one NFT serial from `account` to `counterparty`.

use std::fmt;

use shared_types::{AccountId, Alias, NftId, ResponseCode, TokenId, TokenRelKey};

use crate::domain::transfer_list::AccountRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    /// Owner of the adjusted balance; the sender for an NFT move.
    pub account: AccountRef,
    /// `None` for hbar.
    pub token: Option<TokenId>,
    /// Net units after aggregating repeated entries.
    pub units: i64,
    /// Sum of the approved debits folded into `units` (zero or negative).
    pub allowance_units: i64,
    pub is_approval: bool,
    pub payer: AccountId,
    /// Serial moved, for an NFT change.
    pub serial: Option<i64>,
    /// Receiver of an NFT move.
    pub counterparty: Option<AccountRef>,
    pub expected_decimals: Option<u32>,
}

impl BalanceChange {
    pub fn hbar(account: impl Into<AccountRef>, amount: i64, payer: AccountId) -> Self {
        Self {
            account: account.into(),
            token: None,
            units: amount,
            allowance_units: 0,
            is_approval: false,
            payer,
            serial: None,
            counterparty: None,
            expected_decimals: None,
        }
    }

    pub fn token_adjust(
        token: TokenId,
        account: impl Into<AccountRef>,
        amount: i64,
        payer: AccountId,
    ) -> Self {
        Self {
            token: Some(token),
            ..Self::hbar(account, amount, payer)
        }
    }

    pub fn nft_move(
        nft: NftId,
        sender: impl Into<AccountRef>,
        receiver: impl Into<AccountRef>,
        payer: AccountId,
    ) -> Self {
        Self {
            token: Some(nft.token),
            serial: Some(nft.serial),
            counterparty: Some(receiver.into()),
            ..Self::hbar(sender, 1, payer)
        }
    }

    /// Mark as an allowance debit; approved debits count toward `allowance_units`.
    pub fn approved(mut self) -> Self {
        self.is_approval = true;
        if self.serial.is_none() && self.units < 0 {
            self.allowance_units = self.units;
        }
        self
    }

    pub fn with_expected_decimals(mut self, decimals: Option<u32>) -> Self {
        self.expected_decimals = decimals;
        self
    }

    pub fn is_hbar(&self) -> bool {
        self.token.is_none()
    }

    pub fn is_nft(&self) -> bool {
        self.serial.is_some()
    }

    pub fn is_fungible_token(&self) -> bool {
        self.token.is_some() && self.serial.is_none()
    }

    /// True when `account` gives something away.
    pub fn is_debit(&self) -> bool {
        self.is_nft() || self.units < 0
    }

    pub fn account_id(&self) -> Option<AccountId> {
        self.account.id()
    }

    pub fn counterparty_id(&self) -> Option<AccountId> {
        self.counterparty.as_ref().and_then(AccountRef::id)
    }

    pub fn has_alias(&self) -> bool {
        self.account.is_alias() || self.counterparty.as_ref().is_some_and(AccountRef::is_alias)
    }

    pub fn replace_alias_with(&mut self, id: AccountId) {
        self.account = AccountRef::Id(id);
    }

    pub fn replace_counterparty_alias_with(&mut self, id: AccountId) {
        self.counterparty = Some(AccountRef::Id(id));
    }

    pub fn counterparty_alias(&self) -> Option<&Alias> {
        self.counterparty.as_ref().and_then(AccountRef::alias)
    }

    pub fn aggregate_units(&mut self, amount: i64) {
        self.units += amount;
    }

    pub fn add_allowance_units(&mut self, amount: i64) {
        self.allowance_units += amount;
    }

    pub fn token_rel_key(&self) -> Option<TokenRelKey> {
        Some(TokenRelKey::new(self.account_id()?, self.token?))
    }

    pub fn nft_id(&self) -> Option<NftId> {
        Some(NftId::new(self.token?, self.serial?))
    }

    /// Code for a debit the owner cannot cover.
    pub fn code_on_insufficient_balance(&self) -> ResponseCode {
        if self.is_hbar() {
            ResponseCode::InsufficientAccountBalance
        } else {
            ResponseCode::InsufficientTokenBalance
        }
    }
}

impl fmt::Display for BalanceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.token, self.serial, &self.counterparty) {
            (Some(token), Some(serial), Some(receiver)) => {
                write!(f, "nft {}.{} {} -> {}", token, serial, self.account, receiver)
            }
            (Some(token), _, _) => write!(f, "token {} {} {:+}", token, self.account, self.units),
            _ => write!(f, "hbar {} {:+}", self.account, self.units),
        }
    }
}
