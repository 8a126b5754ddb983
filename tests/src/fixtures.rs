//! # Fixtures
//!
//! A populated world: a payer, a treasury, `n` users, one fungible and one
//! non-fungible token. Every user is associated with both tokens, KYC'd, and
//! owns NFT serial `i + 1`.

use std::collections::{BTreeMap, BTreeSet};

use ledger_transfers::{HederaLedger, SeqNoEntityIdSource, TransferConfig, WorldStores};
use shared_types::{
    Account, AccountId, FungibleAllowanceId, NftAllowanceId, Token, TokenId, TokenRelKey,
    TokenRelationship, TokenType, UniqueToken,
};

pub const NOW: i64 = 1_700_000_000;
pub const PAYER: AccountId = AccountId(2);
pub const TREASURY: AccountId = AccountId(98);
pub const FT: TokenId = TokenId(5000);
pub const NFT: TokenId = TokenId(6000);
pub const FT_DECIMALS: u32 = 2;

pub const HBAR_PER_ACCOUNT: i64 = 1_000_000;
pub const UNITS_PER_REL: i64 = 1_000;

/// First id handed to auto-created accounts.
pub const FIRST_NEW_ID: u64 = 100_001;

pub fn user(i: u64) -> AccountId {
    AccountId(1001 + i)
}

pub struct WorldBuilder {
    stores: WorldStores,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self {
            stores: WorldStores::default(),
        }
    }

    /// Payer, treasury, `users` users and both tokens.
    pub fn standard(users: u64) -> Self {
        let mut builder = Self::new()
            .account(PAYER, HBAR_PER_ACCOUNT)
            .account(TREASURY, HBAR_PER_ACCOUNT)
            .token(FT, TokenType::FungibleCommon)
            .token(NFT, TokenType::NonFungibleUnique)
            .rel(TREASURY, FT, UNITS_PER_REL)
            .rel(TREASURY, NFT, 0);
        for i in 0..users {
            builder = builder
                .account(user(i), HBAR_PER_ACCOUNT)
                .rel(user(i), FT, UNITS_PER_REL)
                .rel(user(i), NFT, 1)
                .nft(i as i64 + 1, user(i));
        }
        builder
    }

    pub fn account(self, id: AccountId, balance: i64) -> Self {
        self.stores.accounts.insert(
            id,
            Account {
                balance,
                expiry: NOW + 90 * 86_400,
                ..Default::default()
            },
        );
        self
    }

    pub fn deleted_account(self, id: AccountId) -> Self {
        self.stores.accounts.insert(
            id,
            Account {
                is_deleted: true,
                expiry: NOW + 90 * 86_400,
                ..Default::default()
            },
        );
        self
    }

    /// A zero-balance account whose expiry has passed.
    pub fn detached_account(self, id: AccountId) -> Self {
        self.stores.accounts.insert(
            id,
            Account {
                expiry: NOW - 1,
                ..Default::default()
            },
        );
        self
    }

    pub fn token(self, id: TokenId, token_type: TokenType) -> Self {
        self.stores.tokens.insert(
            id,
            Token {
                treasury: TREASURY,
                decimals: if token_type == TokenType::FungibleCommon {
                    FT_DECIMALS
                } else {
                    0
                },
                token_type,
                name: format!("token-{}", id),
                ..Default::default()
            },
        );
        self
    }

    pub fn rel(self, account: AccountId, token: TokenId, balance: i64) -> Self {
        self.stores.token_rels.insert(
            TokenRelKey::new(account, token),
            TokenRelationship {
                balance,
                is_kyc_granted: true,
                ..Default::default()
            },
        );
        self
    }

    pub fn frozen_rel(self, account: AccountId, token: TokenId, balance: i64) -> Self {
        self.stores.token_rels.insert(
            TokenRelKey::new(account, token),
            TokenRelationship {
                balance,
                is_frozen: true,
                is_kyc_granted: true,
                ..Default::default()
            },
        );
        self
    }

    pub fn nft(self, serial: i64, owner: AccountId) -> Self {
        self.stores.nfts.insert(
            NFT.nft(serial),
            UniqueToken {
                owner,
                creation_time: NOW - 1,
                ..Default::default()
            },
        );
        self
    }

    /// Replace `owner` with a copy granting `PAYER` every kind of allowance.
    pub fn allowances_for_payer(self, owner: AccountId, hbar: i64, units: i64) -> Self {
        let account = Account {
            balance: HBAR_PER_ACCOUNT,
            expiry: NOW + 90 * 86_400,
            num_nfts_owned: 1,
            crypto_allowances: BTreeMap::from([(PAYER, hbar)]),
            fungible_token_allowances: BTreeMap::from([(
                FungibleAllowanceId {
                    token: FT,
                    spender: PAYER,
                },
                units,
            )]),
            approve_for_all_nfts: BTreeSet::from([NftAllowanceId {
                token: NFT,
                operator: PAYER,
            }]),
            ..Default::default()
        };
        self.stores.accounts.insert(owner, account);
        self
    }

    pub fn build(self) -> WorldStores {
        self.stores
    }

    pub fn ledger(self) -> HederaLedger {
        self.ledger_with(TransferConfig::default())
    }

    pub fn ledger_with(self, config: TransferConfig) -> HederaLedger {
        HederaLedger::with_id_source(
            self.stores,
            config,
            SeqNoEntityIdSource::new(FIRST_NEW_ID),
        )
    }
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A ledger over handles onto `stores`, so tests can inspect the stores
/// directly after a commit or rollback.
pub fn ledger_over(stores: &WorldStores, config: TransferConfig) -> HederaLedger {
    HederaLedger::with_id_source(
        stores.clone(),
        config,
        SeqNoEntityIdSource::new(FIRST_NEW_ID),
    )
}

/// Sum of every account balance in `stores`.
pub fn total_hbar(stores: &WorldStores) -> i64 {
    stores
        .accounts
        .with_read(|accounts| accounts.iter().map(|(_, a)| a.balance).sum())
}

/// Sum of every relationship balance of `token` in `stores`.
pub fn total_units(stores: &WorldStores, token: TokenId) -> i64 {
    stores.token_rels.with_read(|rels| {
        rels.iter()
            .filter(|(key, _)| key.token == token)
            .map(|(_, rel)| rel.balance)
            .sum()
    })
}
