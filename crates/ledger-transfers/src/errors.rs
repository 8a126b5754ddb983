//! Error types for the transfer layer

use ledger_core::LedgerError;
use shared_types::{ResponseCode, TokenId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    /// The batch is invalid; every participating ledger must be rolled back.
    #[error("transfer failed: {0}")]
    Failed(ResponseCode),

    /// Structural misuse of one of the underlying ledgers.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Pending hbar or token adjustments do not net to zero at commit time.
    #[error("inconsistent pending adjustments: net hbar {hbar_net}, unbalanced tokens {unbalanced_tokens:?}")]
    InconsistentAdjustments {
        hbar_net: i64,
        unbalanced_tokens: Vec<TokenId>,
    },

    /// A ledger failed to commit after others had already committed.
    #[error("ledger {failed} failed after {committed:?} committed: {source}")]
    PartialCommit {
        committed: Vec<String>,
        failed: String,
        #[source]
        source: LedgerError,
    },
}

impl TransferError {
    /// Receipt status for this failure.
    pub fn response_code(&self) -> ResponseCode {
        match self {
            TransferError::Failed(code) => *code,
            _ => ResponseCode::FailInvalid,
        }
    }
}
