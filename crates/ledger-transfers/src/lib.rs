//! # Ledger Transfers
//!
//! Zero-sum transfers of hbar, fungible token units and NFT serials across
//! four cooperating transactional ledgers.
//!
//! ## Pipeline
//!
//! ```text
//! transfer lists ──> PureTransferSemanticChecks ──> ImpliedTransfers (BalanceChanges)
//!        ──> TransferLogic::do_zero_sum ──> HederaLedger::commit | rollback
//! ```
//!
//! | Stage | Failure signal |
//! |-------|----------------|
//! | Pure validation | `ResponseCode`, nothing touched |
//! | Zero-sum application | `TransferError::Failed(code)`; caller rolls back every ledger |
//! | Commit | `InconsistentAdjustments` or `PartialCommit`; every ledger already rolled back |
//!
//! ## Ledgers
//!
//! | Ledger | Key | Interceptor |
//! |--------|-----|-------------|
//! | accounts | `AccountId` | `AccountsCommitInterceptor` (hbar deltas) |
//! | token_rels | `TokenRelKey` | `TokenRelsCommitInterceptor` (token deltas) |
//! | nfts | `NftId` | `UniqueTokensCommitInterceptor` (ownership index, removals) |
//! | tokens | `TokenId` | none |

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod interceptors;
pub mod ports;

pub use adapters::SeqNoEntityIdSource;
pub use application::{
    AutoCreationLogic, HederaLedger, LedgerKind, TokenStore, TransferLogic, WorldLedgers,
    WorldStores,
};
pub use config::TransferConfig;
pub use domain::{
    AccountAmount, AccountProperty, AccountRef, AliasManager, BalanceChange, ImpliedTransfers,
    NftProperty, NftTransfer, PureTransferSemanticChecks, SideEffectsTracker, TokenProperty,
    TokenRelProperty, TokenTransferList, TransferRecord, TransferSemanticChecks,
};
pub use errors::TransferError;
pub use ports::EntityIdSource;
