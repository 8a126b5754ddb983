//! # Ledger Core
//!
//! A generic transactional ledger that buffers, validates and atomically
//! commits or discards property changes to typed entities before they become
//! visible in a backing store.
//!
//! ## Architecture
//!
//! | Layer | Contents |
//! |-------|----------|
//! | `domain` | `Property`, change summaries, `EntityChangeSet`, `TransactionalLedger`, `CommitInterceptor`, `LedgerCheck` |
//! | `ports` | `BackingStore` (the durable store the ledger overlays) |
//! | `adapters` | In-memory, shared and recording stores |
//!
//! ## Transaction Lifecycle
//!
//! ```text
//! NO_TXN --begin()--> IN_TXN --commit()/rollback()--> NO_TXN
//!                       |  ^
//!                       +--+ begin() again discards pending changes
//! ```
//!
//! Puts and removes reach the store in the order ids were first touched in
//! the transaction. A commit that fails while persisting leaves the
//! transaction open; the caller must `rollback()`.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod test_utils;

pub use adapters::{InMemoryStore, RecordingStore, SharedStore, StoreOp};
pub use domain::{
    change_summary, ChangeEntry, ChangeMap, CommitInterceptor, EntityChangeSet, LedgerCheck,
    LedgerError, NoopCommitInterceptor, Property, PropertyView, TransactionalLedger,
};
pub use ports::{BackingStore, StoreError};

// Re-export the value types every ledger speaks in.
pub use shared_types::{PropertyValue, ResponseCode};
