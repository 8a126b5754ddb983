//! # Ledger Benchmarks
//!
//! Bodies of the criterion groups run by `benches/ledger_benchmarks.rs`.

pub mod ledger_commit;
pub mod transfer_validation;
