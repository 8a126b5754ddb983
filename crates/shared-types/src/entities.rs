//! # Ledger Entities
//!
//! Plain value records, one per ledger. They are immutable by convention once
//! handed out by a backing store; the transactional ledger only ever mutates
//! private copies of them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::ids::{AccountId, Alias, FungibleAllowanceId, NftAllowanceId};

/// A crypto account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    /// Hbar balance in tinybars.
    pub balance: i64,
    pub is_deleted: bool,
    pub is_smart_contract: bool,
    /// Consensus second at which the account expires.
    pub expiry: i64,
    pub auto_renew_period: i64,
    pub alias: Alias,
    pub memo: String,
    pub num_nfts_owned: i64,
    pub num_associations: i64,
    pub max_auto_associations: i64,
    /// Hbar allowances granted by this account, keyed by spender.
    pub crypto_allowances: BTreeMap<AccountId, i64>,
    /// Fungible token allowances granted by this account.
    pub fungible_token_allowances: BTreeMap<FungibleAllowanceId, i64>,
    /// Operators approved for every serial of a token.
    pub approve_for_all_nfts: BTreeSet<NftAllowanceId>,
}

/// The association between one account and one token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenRelationship {
    pub balance: i64,
    pub is_frozen: bool,
    pub is_kyc_granted: bool,
    pub is_automatic_association: bool,
}

/// One minted serial of a non-fungible token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UniqueToken {
    /// `AccountId::MISSING` while the treasury holds the serial.
    pub owner: AccountId,
    /// Account approved to move this serial, `MISSING` if none.
    pub spender: AccountId,
    pub creation_time: i64,
    pub metadata: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TokenType {
    #[default]
    FungibleCommon,
    NonFungibleUnique,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::FungibleCommon => write!(f, "FUNGIBLE_COMMON"),
            TokenType::NonFungibleUnique => write!(f, "NON_FUNGIBLE_UNIQUE"),
        }
    }
}

/// A token type definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    pub treasury: AccountId,
    pub total_supply: i64,
    pub decimals: u32,
    pub token_type: TokenType,
    pub is_deleted: bool,
    pub is_paused: bool,
    pub name: String,
    pub symbol: String,
}

impl Token {
    pub fn is_non_fungible(&self) -> bool {
        self.token_type == TokenType::NonFungibleUnique
    }
}
