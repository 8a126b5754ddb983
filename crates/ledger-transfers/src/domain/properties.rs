//! # Entity Properties
//!
//! One property enum per ledger. Each variant names a field of the entity,
//! declares the `PropertyValue` shape it stores, and reads or writes it.

use std::fmt;

use ledger_core::Property;
use shared_types::{
    Account, PropertyValue, ResponseCode, Token, TokenRelationship, TokenType, UniqueToken,
};

// =============================================================================
// ACCOUNTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccountProperty {
    Balance,
    IsDeleted,
    IsSmartContract,
    Expiry,
    AutoRenewPeriod,
    Alias,
    Memo,
    NumNftsOwned,
    NumAssociations,
    MaxAutoAssociations,
    CryptoAllowances,
    FungibleTokenAllowances,
    ApproveForAllNftAllowances,
}

impl AccountProperty {
    fn value_kind(self) -> &'static str {
        match self {
            AccountProperty::Balance
            | AccountProperty::Expiry
            | AccountProperty::AutoRenewPeriod
            | AccountProperty::NumNftsOwned
            | AccountProperty::NumAssociations
            | AccountProperty::MaxAutoAssociations => "long",
            AccountProperty::IsDeleted | AccountProperty::IsSmartContract => "bool",
            AccountProperty::Alias => "alias",
            AccountProperty::Memo => "text",
            AccountProperty::CryptoAllowances => "crypto-allowances",
            AccountProperty::FungibleTokenAllowances => "fungible-allowances",
            AccountProperty::ApproveForAllNftAllowances => "nft-operators",
        }
    }
}

impl fmt::Display for AccountProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountProperty::Balance => "BALANCE",
            AccountProperty::IsDeleted => "IS_DELETED",
            AccountProperty::IsSmartContract => "IS_SMART_CONTRACT",
            AccountProperty::Expiry => "EXPIRY",
            AccountProperty::AutoRenewPeriod => "AUTO_RENEW_PERIOD",
            AccountProperty::Alias => "ALIAS",
            AccountProperty::Memo => "MEMO",
            AccountProperty::NumNftsOwned => "NUM_NFTS_OWNED",
            AccountProperty::NumAssociations => "NUM_ASSOCIATIONS",
            AccountProperty::MaxAutoAssociations => "MAX_AUTOMATIC_ASSOCIATIONS",
            AccountProperty::CryptoAllowances => "CRYPTO_ALLOWANCES",
            AccountProperty::FungibleTokenAllowances => "FUNGIBLE_TOKEN_ALLOWANCES",
            AccountProperty::ApproveForAllNftAllowances => "APPROVE_FOR_ALL_NFTS_ALLOWANCES",
        };
        f.write_str(name)
    }
}

impl Property for AccountProperty {
    type Entity = Account;

    const ALL: &'static [Self] = &[
        AccountProperty::Balance,
        AccountProperty::IsDeleted,
        AccountProperty::IsSmartContract,
        AccountProperty::Expiry,
        AccountProperty::AutoRenewPeriod,
        AccountProperty::Alias,
        AccountProperty::Memo,
        AccountProperty::NumNftsOwned,
        AccountProperty::NumAssociations,
        AccountProperty::MaxAutoAssociations,
        AccountProperty::CryptoAllowances,
        AccountProperty::FungibleTokenAllowances,
        AccountProperty::ApproveForAllNftAllowances,
    ];
    const MISSING_ENTITY: ResponseCode = ResponseCode::InvalidAccountId;

    fn get(self, a: &Account) -> PropertyValue {
        match self {
            AccountProperty::Balance => PropertyValue::Long(a.balance),
            AccountProperty::IsDeleted => PropertyValue::Bool(a.is_deleted),
            AccountProperty::IsSmartContract => PropertyValue::Bool(a.is_smart_contract),
            AccountProperty::Expiry => PropertyValue::Long(a.expiry),
            AccountProperty::AutoRenewPeriod => PropertyValue::Long(a.auto_renew_period),
            AccountProperty::Alias => PropertyValue::Alias(a.alias.clone()),
            AccountProperty::Memo => PropertyValue::Text(a.memo.clone()),
            AccountProperty::NumNftsOwned => PropertyValue::Long(a.num_nfts_owned),
            AccountProperty::NumAssociations => PropertyValue::Long(a.num_associations),
            AccountProperty::MaxAutoAssociations => PropertyValue::Long(a.max_auto_associations),
            AccountProperty::CryptoAllowances => {
                PropertyValue::CryptoAllowances(a.crypto_allowances.clone())
            }
            AccountProperty::FungibleTokenAllowances => {
                PropertyValue::FungibleAllowances(a.fungible_token_allowances.clone())
            }
            AccountProperty::ApproveForAllNftAllowances => {
                PropertyValue::NftOperators(a.approve_for_all_nfts.clone())
            }
        }
    }

    fn set(self, a: &mut Account, value: PropertyValue) {
        match (self, value) {
            (AccountProperty::Balance, PropertyValue::Long(v)) => a.balance = v,
            (AccountProperty::IsDeleted, PropertyValue::Bool(v)) => a.is_deleted = v,
            (AccountProperty::IsSmartContract, PropertyValue::Bool(v)) => a.is_smart_contract = v,
            (AccountProperty::Expiry, PropertyValue::Long(v)) => a.expiry = v,
            (AccountProperty::AutoRenewPeriod, PropertyValue::Long(v)) => a.auto_renew_period = v,
            (AccountProperty::Alias, PropertyValue::Alias(v)) => a.alias = v,
            (AccountProperty::Memo, PropertyValue::Text(v)) => a.memo = v,
            (AccountProperty::NumNftsOwned, PropertyValue::Long(v)) => a.num_nfts_owned = v,
            (AccountProperty::NumAssociations, PropertyValue::Long(v)) => a.num_associations = v,
            (AccountProperty::MaxAutoAssociations, PropertyValue::Long(v)) => {
                a.max_auto_associations = v
            }
            (AccountProperty::CryptoAllowances, PropertyValue::CryptoAllowances(v)) => {
                a.crypto_allowances = v
            }
            (AccountProperty::FungibleTokenAllowances, PropertyValue::FungibleAllowances(v)) => {
                a.fungible_token_allowances = v
            }
            (AccountProperty::ApproveForAllNftAllowances, PropertyValue::NftOperators(v)) => {
                a.approve_for_all_nfts = v
            }
            _ => {}
        }
    }

    fn accepts(self, value: &PropertyValue) -> bool {
        value.kind() == self.value_kind()
    }
}

// =============================================================================
// TOKEN RELATIONSHIPS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenRelProperty {
    TokenBalance,
    IsFrozen,
    IsKycGranted,
    IsAutomaticAssociation,
}

impl fmt::Display for TokenRelProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenRelProperty::TokenBalance => "TOKEN_BALANCE",
            TokenRelProperty::IsFrozen => "IS_FROZEN",
            TokenRelProperty::IsKycGranted => "IS_KYC_GRANTED",
            TokenRelProperty::IsAutomaticAssociation => "IS_AUTOMATIC_ASSOCIATION",
        };
        f.write_str(name)
    }
}

impl Property for TokenRelProperty {
    type Entity = TokenRelationship;

    const ALL: &'static [Self] = &[
        TokenRelProperty::TokenBalance,
        TokenRelProperty::IsFrozen,
        TokenRelProperty::IsKycGranted,
        TokenRelProperty::IsAutomaticAssociation,
    ];
    const MISSING_ENTITY: ResponseCode = ResponseCode::TokenNotAssociatedToAccount;

    fn get(self, rel: &TokenRelationship) -> PropertyValue {
        match self {
            TokenRelProperty::TokenBalance => PropertyValue::Long(rel.balance),
            TokenRelProperty::IsFrozen => PropertyValue::Bool(rel.is_frozen),
            TokenRelProperty::IsKycGranted => PropertyValue::Bool(rel.is_kyc_granted),
            TokenRelProperty::IsAutomaticAssociation => {
                PropertyValue::Bool(rel.is_automatic_association)
            }
        }
    }

    fn set(self, rel: &mut TokenRelationship, value: PropertyValue) {
        match (self, value) {
            (TokenRelProperty::TokenBalance, PropertyValue::Long(v)) => rel.balance = v,
            (TokenRelProperty::IsFrozen, PropertyValue::Bool(v)) => rel.is_frozen = v,
            (TokenRelProperty::IsKycGranted, PropertyValue::Bool(v)) => rel.is_kyc_granted = v,
            (TokenRelProperty::IsAutomaticAssociation, PropertyValue::Bool(v)) => {
                rel.is_automatic_association = v
            }
            _ => {}
        }
    }

    fn accepts(self, value: &PropertyValue) -> bool {
        match self {
            TokenRelProperty::TokenBalance => matches!(value, PropertyValue::Long(_)),
            _ => matches!(value, PropertyValue::Bool(_)),
        }
    }
}

// =============================================================================
// NFTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NftProperty {
    Owner,
    Spender,
    CreationTime,
    Metadata,
}

impl fmt::Display for NftProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NftProperty::Owner => "OWNER",
            NftProperty::Spender => "SPENDER",
            NftProperty::CreationTime => "CREATION_TIME",
            NftProperty::Metadata => "METADATA",
        };
        f.write_str(name)
    }
}

impl Property for NftProperty {
    type Entity = UniqueToken;

    const ALL: &'static [Self] = &[
        NftProperty::Owner,
        NftProperty::Spender,
        NftProperty::CreationTime,
        NftProperty::Metadata,
    ];
    const MISSING_ENTITY: ResponseCode = ResponseCode::InvalidNftId;

    fn get(self, nft: &UniqueToken) -> PropertyValue {
        match self {
            NftProperty::Owner => PropertyValue::Account(nft.owner),
            NftProperty::Spender => PropertyValue::Account(nft.spender),
            NftProperty::CreationTime => PropertyValue::Long(nft.creation_time),
            NftProperty::Metadata => PropertyValue::Bytes(nft.metadata.clone()),
        }
    }

    fn set(self, nft: &mut UniqueToken, value: PropertyValue) {
        match (self, value) {
            (NftProperty::Owner, PropertyValue::Account(v)) => nft.owner = v,
            (NftProperty::Spender, PropertyValue::Account(v)) => nft.spender = v,
            (NftProperty::CreationTime, PropertyValue::Long(v)) => nft.creation_time = v,
            (NftProperty::Metadata, PropertyValue::Bytes(v)) => nft.metadata = v,
            _ => {}
        }
    }

    fn accepts(self, value: &PropertyValue) -> bool {
        matches!(
            (self, value),
            (NftProperty::Owner, PropertyValue::Account(_))
                | (NftProperty::Spender, PropertyValue::Account(_))
                | (NftProperty::CreationTime, PropertyValue::Long(_))
                | (NftProperty::Metadata, PropertyValue::Bytes(_))
        )
    }
}

// =============================================================================
// TOKENS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenProperty {
    Treasury,
    TotalSupply,
    Decimals,
    TokenType,
    IsDeleted,
    IsPaused,
    Name,
    Symbol,
}

impl fmt::Display for TokenProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenProperty::Treasury => "TREASURY",
            TokenProperty::TotalSupply => "TOTAL_SUPPLY",
            TokenProperty::Decimals => "DECIMALS",
            TokenProperty::TokenType => "TOKEN_TYPE",
            TokenProperty::IsDeleted => "IS_DELETED",
            TokenProperty::IsPaused => "IS_PAUSED",
            TokenProperty::Name => "NAME",
            TokenProperty::Symbol => "SYMBOL",
        };
        f.write_str(name)
    }
}

impl Property for TokenProperty {
    type Entity = Token;

    const ALL: &'static [Self] = &[
        TokenProperty::Treasury,
        TokenProperty::TotalSupply,
        TokenProperty::Decimals,
        TokenProperty::TokenType,
        TokenProperty::IsDeleted,
        TokenProperty::IsPaused,
        TokenProperty::Name,
        TokenProperty::Symbol,
    ];
    const MISSING_ENTITY: ResponseCode = ResponseCode::InvalidTokenId;

    fn get(self, token: &Token) -> PropertyValue {
        match self {
            TokenProperty::Treasury => PropertyValue::Account(token.treasury),
            TokenProperty::TotalSupply => PropertyValue::Long(token.total_supply),
            TokenProperty::Decimals => PropertyValue::Long(i64::from(token.decimals)),
            TokenProperty::TokenType => PropertyValue::TokenType(token.token_type),
            TokenProperty::IsDeleted => PropertyValue::Bool(token.is_deleted),
            TokenProperty::IsPaused => PropertyValue::Bool(token.is_paused),
            TokenProperty::Name => PropertyValue::Text(token.name.clone()),
            TokenProperty::Symbol => PropertyValue::Text(token.symbol.clone()),
        }
    }

    fn set(self, token: &mut Token, value: PropertyValue) {
        match (self, value) {
            (TokenProperty::Treasury, PropertyValue::Account(v)) => token.treasury = v,
            (TokenProperty::TotalSupply, PropertyValue::Long(v)) => token.total_supply = v,
            (TokenProperty::Decimals, PropertyValue::Long(v)) => {
                if let Ok(decimals) = u32::try_from(v) {
                    token.decimals = decimals;
                }
            }
            (TokenProperty::TokenType, PropertyValue::TokenType(v)) => token.token_type = v,
            (TokenProperty::IsDeleted, PropertyValue::Bool(v)) => token.is_deleted = v,
            (TokenProperty::IsPaused, PropertyValue::Bool(v)) => token.is_paused = v,
            (TokenProperty::Name, PropertyValue::Text(v)) => token.name = v,
            (TokenProperty::Symbol, PropertyValue::Text(v)) => token.symbol = v,
            _ => {}
        }
    }

    fn accepts(self, value: &PropertyValue) -> bool {
        match (self, value) {
            (TokenProperty::Decimals, PropertyValue::Long(v)) => u32::try_from(*v).is_ok(),
            (TokenProperty::TotalSupply, PropertyValue::Long(_)) => true,
            (TokenProperty::Treasury, PropertyValue::Account(_)) => true,
            (TokenProperty::TokenType, PropertyValue::TokenType(_)) => true,
            (TokenProperty::IsDeleted | TokenProperty::IsPaused, PropertyValue::Bool(_)) => true,
            (TokenProperty::Name | TokenProperty::Symbol, PropertyValue::Text(_)) => true,
            _ => false,
        }
    }
}

/// Token type as stored, for checks that only see a property view.
pub fn token_type_of(value: &PropertyValue) -> TokenType {
    match value {
        PropertyValue::TokenType(t) => *t,
        _ => TokenType::FungibleCommon,
    }
}
