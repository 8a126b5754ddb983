//! # Ledger Errors
//!
//! Structural misuse of a ledger (no open transaction, double create, mutating
//! a missing entity) and persistence failures during commit. Domain rule
//! violations are never errors; they resolve to a `ResponseCode`.

use thiserror::Error;

use crate::ports::StoreError;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// A transactional operation was called with no open transaction.
    #[error("[{ledger}] no active transaction for {operation}")]
    NoActiveTransaction {
        ledger: String,
        operation: &'static str,
    },

    /// `create` on an id that already exists or is pending creation.
    #[error("[{ledger}] entity {id} already exists")]
    AlreadyExists { ledger: String, id: String },

    /// Mutation or read of an id that neither the store nor the transaction knows.
    #[error("[{ledger}] no such entity {id}")]
    MissingEntity { ledger: String, id: String },

    /// `set` with a value whose shape does not match the property.
    #[error("[{ledger}] property {property} does not accept {value}")]
    ValueTypeMismatch {
        ledger: String,
        property: String,
        value: String,
    },

    /// A commit interceptor or cross-ledger check refused the pending state.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// The backing store failed while the change set was being flushed.
    ///
    /// The transaction is still open and must be rolled back by the caller.
    #[error("[{ledger}] commit failed mid-way, manual rollback required: {source}")]
    CommitFailed {
        ledger: String,
        #[source]
        source: StoreError,
    },
}

impl LedgerError {
    /// True for errors that leave the transaction open.
    pub fn requires_rollback(&self) -> bool {
        matches!(
            self,
            LedgerError::CommitFailed { .. } | LedgerError::IllegalState(_)
        )
    }
}
