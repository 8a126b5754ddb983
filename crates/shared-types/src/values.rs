//! # Property Values
//!
//! The closed set of value shapes a pending property change can carry.
//! Each entity property accepts exactly one of these variants; the ledger
//! rejects a `set` whose value has the wrong shape instead of failing later
//! inside a setter.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::entities::TokenType;
use crate::ids::{AccountId, Alias, FungibleAllowanceId, NftAllowanceId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    Long(i64),
    Bool(bool),
    Account(AccountId),
    Alias(Alias),
    Text(String),
    Bytes(Vec<u8>),
    TokenType(TokenType),
    CryptoAllowances(BTreeMap<AccountId, i64>),
    FungibleAllowances(BTreeMap<FungibleAllowanceId, i64>),
    NftOperators(BTreeSet<NftAllowanceId>),
}

impl PropertyValue {
    pub fn as_long(&self) -> Option<i64> {
        match self {
            PropertyValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_account(&self) -> Option<AccountId> {
        match self {
            PropertyValue::Account(v) => Some(*v),
            _ => None,
        }
    }

    /// Name of the variant, used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Long(_) => "long",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Account(_) => "account",
            PropertyValue::Alias(_) => "alias",
            PropertyValue::Text(_) => "text",
            PropertyValue::Bytes(_) => "bytes",
            PropertyValue::TokenType(_) => "token-type",
            PropertyValue::CryptoAllowances(_) => "crypto-allowances",
            PropertyValue::FungibleAllowances(_) => "fungible-allowances",
            PropertyValue::NftOperators(_) => "nft-operators",
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Long(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<AccountId> for PropertyValue {
    fn from(v: AccountId) -> Self {
        PropertyValue::Account(v)
    }
}

impl From<Alias> for PropertyValue {
    fn from(v: Alias) -> Self {
        PropertyValue::Alias(v)
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Long(v) => write!(f, "{}", v),
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Account(v) => write!(f, "{}", v),
            PropertyValue::Alias(v) => write!(f, "{}", v),
            PropertyValue::Text(v) => write!(f, "{}", v),
            PropertyValue::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
            PropertyValue::TokenType(v) => write!(f, "{}", v),
            PropertyValue::CryptoAllowances(m) => {
                write!(f, "[")?;
                for (i, (spender, amount)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", spender, amount)?;
                }
                write!(f, "]")
            }
            PropertyValue::FungibleAllowances(m) => {
                write!(f, "[")?;
                for (i, (id, amount)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}/{}={}", id.token, id.spender, amount)?;
                }
                write!(f, "]")
            }
            PropertyValue::NftOperators(s) => {
                write!(f, "[")?;
                for (i, id) in s.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}/{}", id.token, id.operator)?;
                }
                write!(f, "]")
            }
        }
    }
}
