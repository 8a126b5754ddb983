//! # Transfer Benchmarks
//!
//! Pure validation alone, then the full begin/transfer/commit path through
//! `HederaLedger`.

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use ledger_transfers::{
    AccountAmount, NftTransfer, PureTransferSemanticChecks, TokenTransferList, TransferConfig,
    TransferSemanticChecks,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::TokenId;
use std::time::Duration;

use crate::fixtures::{user, WorldBuilder, FT, NFT, NOW, PAYER};

fn hbar_list(accounts: u64) -> Vec<AccountAmount> {
    let mut adjusts: Vec<AccountAmount> = (1..accounts)
        .map(|i| AccountAmount::new(user(i), 10))
        .collect();
    adjusts.push(AccountAmount::new(user(0), -10 * (accounts as i64 - 1)));
    adjusts
}

fn token_lists(tokens: u64) -> Vec<TokenTransferList> {
    (0..tokens)
        .map(|t| {
            TokenTransferList::fungible(
                TokenId(7_000 + t),
                vec![
                    AccountAmount::new(user(0), -5),
                    AccountAmount::new(user(1), 3),
                    AccountAmount::new(user(2), 2),
                ],
            )
        })
        .collect()
}

pub fn bench_full_pure_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer-validation");
    group.measurement_time(Duration::from_secs(5));

    let config = TransferConfig {
        max_hbar_adjusts: 1_000,
        max_token_adjusts: 1_000,
        max_balance_changes: 10_000,
        ..Default::default()
    };
    let checks = PureTransferSemanticChecks;

    for size in [4u64, 32, 256] {
        let hbar = hbar_list(size);
        let tokens = token_lists(size / 4);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("full_pure_validation", size), &size, |b, _| {
            b.iter(|| black_box(checks.full_pure_validation(&hbar, &tokens, &config)))
        });
    }

    group.finish();
}

pub fn bench_transfer_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer-round-trip");
    group.measurement_time(Duration::from_secs(5));

    const USERS: u64 = 64;
    let mut ledger = WorldBuilder::standard(USERS).ledger();
    let mut rng = StdRng::seed_from_u64(11);

    group.bench_function("hbar_and_units", |b| {
        b.iter(|| {
            let from = user(rng.gen_range(0..USERS));
            let to = user(rng.gen_range(0..USERS));
            if from == to {
                return;
            }
            ledger.begin(NOW);
            let applied = ledger.transfer(
                &[AccountAmount::new(from, -1), AccountAmount::new(to, 1)],
                &[TokenTransferList::fungible(
                    FT,
                    vec![AccountAmount::new(from, -1), AccountAmount::new(to, 1)],
                )],
                PAYER,
            );
            match applied {
                Ok(_) => {
                    black_box(ledger.commit().unwrap());
                }
                Err(_) => ledger.rollback(),
            }
        })
    });

    // Serial 1 ping-pongs between the first two users.
    let mut holder = [user(0), user(1)];
    group.bench_function("nft_move", |b| {
        b.iter(|| {
            ledger.begin(NOW);
            ledger
                .transfer(
                    &[],
                    &[TokenTransferList::nft(
                        NFT,
                        vec![NftTransfer::new(holder[0], holder[1], 1)],
                    )],
                    PAYER,
                )
                .unwrap();
            black_box(ledger.commit().unwrap());
            holder.swap(0, 1);
        })
    });

    group.finish();
}

