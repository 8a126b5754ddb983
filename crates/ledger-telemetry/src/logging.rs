//! Structured logging macros.
//!
//! Every event concerning a ledger carries a `ledger` field so that the lines
//! of the accounts, token-relationship, NFT and token ledgers can be told
//! apart when they interleave inside one multi-ledger transaction.

/// Log an event with an explicit component field.
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a ledger lifecycle event with the ledger's name as a standard field.
#[macro_export]
macro_rules! log_ledger_event {
    ($level:ident, $ledger:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            ledger = %$ledger,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a transfer-related event keyed by the paying account.
#[macro_export]
macro_rules! log_transfer_event {
    ($level:ident, $msg:expr, $payer:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            payer = %$payer,
            $($($field)*,)?
            $msg
        )
    };
}
