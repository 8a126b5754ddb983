//! # Transfer Lists
//!
//! The shape transfers arrive in: an hbar list of signed account amounts and
//! a list of per-token lists, each either fungible amounts or NFT moves.

use serde::{Deserialize, Serialize};
use std::fmt;

use shared_types::{AccountId, Alias, TokenId};

/// An account addressed by number or by alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountRef {
    Id(AccountId),
    Alias(Alias),
}

impl AccountRef {
    pub fn id(&self) -> Option<AccountId> {
        match self {
            AccountRef::Id(id) => Some(*id),
            AccountRef::Alias(_) => None,
        }
    }

    pub fn alias(&self) -> Option<&Alias> {
        match self {
            AccountRef::Alias(alias) => Some(alias),
            AccountRef::Id(_) => None,
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, AccountRef::Alias(_))
    }
}

impl From<AccountId> for AccountRef {
    fn from(id: AccountId) -> Self {
        AccountRef::Id(id)
    }
}

impl From<Alias> for AccountRef {
    fn from(alias: Alias) -> Self {
        AccountRef::Alias(alias)
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRef::Id(id) => write!(f, "{}", id),
            AccountRef::Alias(alias) => write!(f, "{}", alias),
        }
    }
}

/// One signed amount. `account` is `None` when the sender left it unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    pub account: Option<AccountRef>,
    pub amount: i64,
    /// Debit drawn from an allowance the account granted to the payer.
    pub is_approval: bool,
}

impl AccountAmount {
    pub fn new(account: impl Into<AccountRef>, amount: i64) -> Self {
        Self {
            account: Some(account.into()),
            amount,
            is_approval: false,
        }
    }

    pub fn approved(account: impl Into<AccountRef>, amount: i64) -> Self {
        Self {
            is_approval: true,
            ..Self::new(account, amount)
        }
    }

    pub fn without_account(amount: i64) -> Self {
        Self {
            account: None,
            amount,
            is_approval: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTransfer {
    pub sender: Option<AccountRef>,
    pub receiver: Option<AccountRef>,
    pub serial: i64,
    pub is_approval: bool,
}

impl NftTransfer {
    pub fn new(sender: impl Into<AccountRef>, receiver: impl Into<AccountRef>, serial: i64) -> Self {
        Self {
            sender: Some(sender.into()),
            receiver: Some(receiver.into()),
            serial,
            is_approval: false,
        }
    }

    pub fn approved(
        sender: impl Into<AccountRef>,
        receiver: impl Into<AccountRef>,
        serial: i64,
    ) -> Self {
        Self {
            is_approval: true,
            ..Self::new(sender, receiver, serial)
        }
    }
}

/// Transfers of one token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenTransferList {
    pub token: Option<TokenId>,
    pub transfers: Vec<AccountAmount>,
    pub nft_transfers: Vec<NftTransfer>,
    /// Decimals the sender expects the token to have.
    pub expected_decimals: Option<u32>,
}

impl TokenTransferList {
    pub fn fungible(token: TokenId, transfers: Vec<AccountAmount>) -> Self {
        Self {
            token: Some(token),
            transfers,
            ..Default::default()
        }
    }

    pub fn nft(token: TokenId, nft_transfers: Vec<NftTransfer>) -> Self {
        Self {
            token: Some(token),
            nft_transfers,
            ..Default::default()
        }
    }

    pub fn with_expected_decimals(mut self, decimals: u32) -> Self {
        self.expected_decimals = Some(decimals);
        self
    }

    pub fn has_nft_transfers(&self) -> bool {
        !self.nft_transfers.is_empty()
    }
}
