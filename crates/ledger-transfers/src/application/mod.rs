//! # Application Layer
//!
//! - `world_ledgers.rs` - The four ledgers a transfer spans
//! - `auto_creation.rs` - Accounts created on first credit to an alias
//! - `token_store.rs` - One token change across token, rel, nft and account ledgers
//! - `transfer_logic.rs` - Zero-sum application of a batch of balance changes
//! - `hedera_ledger.rs` - Transaction facade: begin, transfer, commit, rollback

pub mod auto_creation;
pub mod hedera_ledger;
pub mod token_store;
pub mod transfer_logic;
pub mod world_ledgers;

pub use auto_creation::{AutoCreationLogic, AUTO_MEMO};
pub use hedera_ledger::HederaLedger;
pub use token_store::TokenStore;
pub use transfer_logic::TransferLogic;
pub use world_ledgers::{
    AccountsLedger, LedgerKind, NftsLedger, TokenRelsLedger, TokensLedger, WorldLedgers,
    WorldStores,
};
