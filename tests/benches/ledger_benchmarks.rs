//! # Ledger Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | ledger-commit | begin/set/commit and rollback cycles by change-set size |
//! | transfer-validation | `full_pure_validation` over growing transfer lists |
//! | transfer-round-trip | begin/transfer/commit through `HederaLedger` |

use criterion::{criterion_group, criterion_main};
use ledger_tests::benchmarks::{ledger_commit, transfer_validation};

criterion_group!(
    benches,
    ledger_commit::bench_commit_throughput,
    transfer_validation::bench_full_pure_validation,
    transfer_validation::bench_transfer_round_trip,
);

criterion_main!(benches);
