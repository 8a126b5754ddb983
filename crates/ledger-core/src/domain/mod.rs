//! Domain layer of the transactional ledger.

pub mod change_set;
pub mod change_summary;
pub mod check;
pub mod errors;
pub mod interceptor;
pub mod ledger;
pub mod property;

pub use change_set::{ChangeEntry, EntityChangeSet};
pub use check::{LedgerCheck, PropertyView};
pub use errors::LedgerError;
pub use interceptor::{CommitInterceptor, NoopCommitInterceptor};
pub use ledger::TransactionalLedger;
pub use property::{full_changes, ChangeMap, Property};
