//! Transfer domain: property sets, wire lists, balance changes and checks.

pub mod alias_manager;
pub mod balance_change;
pub mod implied_transfers;
pub mod properties;
pub mod pure_checks;
pub mod scoped_checks;
pub mod side_effects;
pub mod transfer_list;

pub use alias_manager::AliasManager;
pub use balance_change::BalanceChange;
pub use implied_transfers::ImpliedTransfers;
pub use properties::{AccountProperty, NftProperty, TokenProperty, TokenRelProperty};
pub use pure_checks::{PureTransferSemanticChecks, TransferSemanticChecks};
pub use scoped_checks::{AccountScopedCheck, NftOwnershipCheck, TokenCheck, TokenRelScopedCheck};
pub use side_effects::{NftOwnershipChange, SideEffectsTracker, TransferRecord};
pub use transfer_list::{AccountAmount, AccountRef, NftTransfer, TokenTransferList};
