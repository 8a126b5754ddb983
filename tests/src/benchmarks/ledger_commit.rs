//! # Ledger Commit Benchmarks
//!
//! Cost of buffering balance changes and flushing them, by change-set size.
//! Each iteration runs a whole begin/set/commit cycle on the accounts ledger.

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use ledger_core::{InMemoryStore, TransactionalLedger};
use ledger_transfers::AccountProperty;
use shared_types::{Account, AccountId};
use std::time::Duration;

type Accounts = TransactionalLedger<AccountId, AccountProperty, InMemoryStore<AccountId, Account>>;

fn seeded(size: u64) -> Accounts {
    let mut store = InMemoryStore::new();
    for id in 0..size {
        store.insert(
            AccountId(1_000 + id),
            Account {
                balance: 1_000_000,
                ..Default::default()
            },
        );
    }
    Accounts::new("accounts", store)
}

pub fn bench_commit_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger-commit");
    group.measurement_time(Duration::from_secs(5));

    for size in [10u64, 100, 1_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("set_and_commit", size), &size, |b, &size| {
            let mut ledger = seeded(size);
            let mut round = 0i64;
            b.iter(|| {
                round += 1;
                ledger.begin();
                for id in 0..size {
                    ledger
                        .set(&AccountId(1_000 + id), AccountProperty::Balance, round)
                        .unwrap();
                }
                ledger.commit().unwrap();
            })
        });

        group.bench_with_input(BenchmarkId::new("set_and_rollback", size), &size, |b, &size| {
            let mut ledger = seeded(size);
            b.iter(|| {
                ledger.begin();
                for id in 0..size {
                    ledger
                        .set(&AccountId(1_000 + id), AccountProperty::Balance, 1i64)
                        .unwrap();
                }
                ledger.rollback().unwrap();
            })
        });
    }

    group.bench_function("get_through_pending_changes", |b| {
        let mut ledger = seeded(1_000);
        ledger.begin();
        for id in (0..1_000).step_by(2) {
            ledger
                .set(&AccountId(1_000 + id), AccountProperty::Balance, 7i64)
                .unwrap();
        }
        b.iter(|| {
            for id in 0..1_000 {
                black_box(ledger.get(&AccountId(1_000 + id), AccountProperty::Balance).unwrap());
            }
        })
    });

    group.finish();
}
