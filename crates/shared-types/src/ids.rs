//! # Entity Identifiers
//!
//! Every ledger is keyed by one of these ids. All of them are `Copy`/`Ord`
//! except `Alias`, which wraps raw key bytes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shard and realm are fixed at zero for every id on this network.
const SHARD_REALM: &str = "0.0";

/// An account number.
///
/// `AccountId::MISSING` (number zero) stands for "no account", e.g. the
/// owner of an NFT still held by its token's treasury.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl AccountId {
    /// Sentinel for an absent account.
    pub const MISSING: AccountId = AccountId(0);

    pub fn num(&self) -> u64 {
        self.0
    }

    pub fn is_missing(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", SHARD_REALM, self.0)
    }
}

/// A token type number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TokenId(pub u64);

impl TokenId {
    pub fn num(&self) -> u64 {
        self.0
    }

    /// The NFT with the given serial number of this token.
    pub fn nft(self, serial: i64) -> NftId {
        NftId {
            token: self,
            serial,
        }
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", SHARD_REALM, self.0)
    }
}

/// One serial number of a non-fungible token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NftId {
    pub token: TokenId,
    pub serial: i64,
}

impl NftId {
    pub fn new(token: TokenId, serial: i64) -> Self {
        Self { token, serial }
    }
}

impl fmt::Display for NftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.token, self.serial)
    }
}

/// Composite key of the token-relationship ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenRelKey {
    pub account: AccountId,
    pub token: TokenId,
}

impl TokenRelKey {
    pub fn new(account: AccountId, token: TokenId) -> Self {
        Self { account, token }
    }
}

impl fmt::Display for TokenRelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.account, self.token)
    }
}

/// Key bytes standing in for an account that may not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Alias(pub Vec<u8>);

impl Alias {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

/// Key of a fungible allowance an owner granted: (token, spender).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FungibleAllowanceId {
    pub token: TokenId,
    pub spender: AccountId,
}

/// Key of an "approve for all serials" grant: (token, operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NftAllowanceId {
    pub token: TokenId,
    pub operator: AccountId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        assert_eq!(AccountId(1001).to_string(), "0.0.1001");
        assert_eq!(TokenId(7).nft(3).to_string(), "0.0.7.3");
        assert_eq!(
            TokenRelKey::new(AccountId(2), TokenId(5)).to_string(),
            "0.0.2-0.0.5"
        );
        assert_eq!(Alias::new(vec![0xab, 0x01]).to_string(), "0xab01");
    }

    #[test]
    fn test_missing_account() {
        assert!(AccountId::MISSING.is_missing());
        assert!(!AccountId(3).is_missing());
        assert_eq!(AccountId::default(), AccountId::MISSING);
    }

    #[test]
    fn test_rel_keys_order_by_account_then_token() {
        let a = TokenRelKey::new(AccountId(1), TokenId(9));
        let b = TokenRelKey::new(AccountId(2), TokenId(1));
        assert!(a < b);
    }
}
