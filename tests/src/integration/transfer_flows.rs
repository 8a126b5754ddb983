//! # Transfer Flows
//!
//! End-to-end transfers through `HederaLedger` over shared in-memory stores:
//!
//! ```text
//! transfer lists ──> ImpliedTransfers ──> do_zero_sum ──> commit ──> stores
//!                                              │
//!                                              └─ Failed(code) ──> rollback
//! ```

#[cfg(test)]
mod tests {
    use ledger_core::{BackingStore, PropertyValue};
    use ledger_telemetry::TRANSFERS_PROCESSED;
    use ledger_transfers::{
        AccountAmount, AccountProperty, AccountRef, BalanceChange, HederaLedger, NftTransfer,
        TokenTransferList, TransferConfig, TransferError,
    };
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use shared_types::{AccountId, Alias, FungibleAllowanceId, ResponseCode};
    use std::collections::BTreeMap;

    use crate::fixtures::*;

    // =============================================================================
    // HELPERS
    // =============================================================================

    fn hbar(from: AccountId, to: impl Into<AccountRef>, amount: i64) -> Vec<AccountAmount> {
        vec![AccountAmount::new(from, -amount), AccountAmount::new(to, amount)]
    }

    fn units(from: AccountId, to: impl Into<AccountRef>, amount: i64) -> TokenTransferList {
        TokenTransferList::fungible(
            FT,
            vec![AccountAmount::new(from, -amount), AccountAmount::new(to, amount)],
        )
    }

    fn failed_code(result: Result<Vec<BalanceChange>, TransferError>) -> ResponseCode {
        match result {
            Err(TransferError::Failed(code)) => code,
            other => panic!("expected a failed transfer, got {:?}", other),
        }
    }

    /// Run one transfer transaction, committing on success and rolling back
    /// on failure.
    fn run(
        ledger: &mut HederaLedger,
        hbar_adjusts: &[AccountAmount],
        token_adjusts: &[TokenTransferList],
    ) -> ResponseCode {
        ledger.begin(NOW);
        match ledger.transfer(hbar_adjusts, token_adjusts, PAYER) {
            Ok(_) => {
                ledger.commit().unwrap();
                ResponseCode::Ok
            }
            Err(err) => {
                ledger.rollback();
                err.response_code()
            }
        }
    }

    // =============================================================================
    // HAPPY PATH
    // =============================================================================

    #[test]
    fn test_mixed_transfer_commits_on_every_ledger() {
        let stores = WorldBuilder::standard(3).build();
        let hbar_supply = total_hbar(&stores);
        let ft_supply = total_units(&stores, FT);
        let mut ledger = ledger_over(&stores, TransferConfig::default());

        ledger.begin(NOW);
        ledger
            .transfer(
                &hbar(user(0), user(1), 500),
                &[
                    units(user(0), user(2), 10).with_expected_decimals(FT_DECIMALS),
                    TokenTransferList::nft(NFT, vec![NftTransfer::new(user(0), user(1), 1)]),
                ],
                PAYER,
            )
            .unwrap();
        let record = ledger.commit().unwrap();

        assert_eq!(ledger.balance_of(user(0)).unwrap(), HBAR_PER_ACCOUNT - 500);
        assert_eq!(ledger.balance_of(user(1)).unwrap(), HBAR_PER_ACCOUNT + 500);
        assert_eq!(ledger.token_balance_of(user(2), FT).unwrap(), UNITS_PER_REL + 10);
        assert_eq!(ledger.owner_of(NFT.nft(1)).unwrap(), user(1));
        assert_eq!(ledger.token_balance_of(user(1), NFT).unwrap(), 2);

        assert_eq!(total_hbar(&stores), hbar_supply);
        assert_eq!(total_units(&stores, FT), ft_supply);

        assert_eq!(record.hbar_adjustment(user(1)), 500);
        assert_eq!(record.token_adjustment(FT, user(0)), -10);
        assert_eq!(record.nft_ownership_changes.len(), 1);
        assert_eq!(record.nft_ownership_changes[0].to, user(1));

        let index = ledger.world().nfts.interceptor().index();
        assert_eq!(index.count(user(0)), 0);
        assert_eq!(index.count(user(1)), 2);
    }

    #[test]
    fn test_approved_transfers_spend_allowances() {
        let stores = WorldBuilder::standard(2)
            .allowances_for_payer(user(0), 100, 10)
            .build();
        let mut ledger = ledger_over(&stores, TransferConfig::default());

        let code = run(
            &mut ledger,
            &[
                AccountAmount::approved(user(0), -40),
                AccountAmount::new(user(1), 40),
            ],
            &[
                TokenTransferList::fungible(
                    FT,
                    vec![
                        AccountAmount::approved(user(0), -4),
                        AccountAmount::new(user(1), 4),
                    ],
                ),
                TokenTransferList::nft(NFT, vec![NftTransfer::approved(user(0), user(1), 1)]),
            ],
        );
        assert_eq!(code, ResponseCode::Ok);

        assert_eq!(
            ledger
                .world()
                .accounts
                .get(&user(0), AccountProperty::CryptoAllowances)
                .unwrap(),
            PropertyValue::CryptoAllowances(BTreeMap::from([(PAYER, 60)]))
        );
        assert_eq!(
            ledger
                .world()
                .accounts
                .get(&user(0), AccountProperty::FungibleTokenAllowances)
                .unwrap(),
            PropertyValue::FungibleAllowances(BTreeMap::from([(
                FungibleAllowanceId {
                    token: FT,
                    spender: PAYER,
                },
                6,
            )]))
        );
        assert_eq!(ledger.owner_of(NFT.nft(1)).unwrap(), user(1));

        let code = run(
            &mut ledger,
            &[
                AccountAmount::approved(user(0), -61),
                AccountAmount::new(user(1), 61),
            ],
            &[],
        );
        assert_eq!(code, ResponseCode::AmountExceedsAllowance);
        assert_eq!(ledger.balance_of(user(0)).unwrap(), HBAR_PER_ACCOUNT - 40);
    }

    #[test]
    fn test_approved_nft_move_without_operator_grant() {
        let mut ledger = WorldBuilder::standard(2).ledger();
        let code = run(
            &mut ledger,
            &[],
            &[TokenTransferList::nft(
                NFT,
                vec![NftTransfer::approved(user(0), user(1), 1)],
            )],
        );
        assert_eq!(code, ResponseCode::SpenderDoesNotHaveAllowance);
        assert_eq!(ledger.owner_of(NFT.nft(1)).unwrap(), user(0));
    }

    #[test]
    fn test_nft_round_trip_through_treasury() {
        let stores = WorldBuilder::standard(2).build();
        let mut ledger = ledger_over(&stores, TransferConfig::default());

        let to_treasury = [TokenTransferList::nft(
            NFT,
            vec![NftTransfer::new(user(0), TREASURY, 1)],
        )];
        assert_eq!(run(&mut ledger, &[], &to_treasury), ResponseCode::Ok);
        assert_eq!(ledger.owner_of(NFT.nft(1)).unwrap(), TREASURY);
        let stored_owner = stores
            .nfts
            .get(&NFT.nft(1))
            .map(|nft| nft.owner)
            .unwrap();
        assert!(stored_owner.is_missing());
        assert_eq!(ledger.world().nfts.interceptor().index().count(user(0)), 0);

        let to_user = [TokenTransferList::nft(
            NFT,
            vec![NftTransfer::new(TREASURY, user(1), 1)],
        )];
        assert_eq!(run(&mut ledger, &[], &to_user), ResponseCode::Ok);
        assert_eq!(ledger.owner_of(NFT.nft(1)).unwrap(), user(1));
        assert_eq!(ledger.token_balance_of(TREASURY, NFT).unwrap(), 0);
    }

    #[test]
    fn test_burned_serial_removed_by_interceptor() -> anyhow::Result<()> {
        let stores = WorldBuilder::standard(2).build();
        let mut ledger = ledger_over(&stores, TransferConfig::default());

        ledger.begin(NOW);
        ledger.world_mut().nfts.destroy(&NFT.nft(2))?;
        let record = ledger.commit()?;

        assert!(record.is_empty());
        assert!(!stores.nfts.contains(&NFT.nft(2)));
        assert!(stores.nfts.contains(&NFT.nft(1)));
        assert_eq!(ledger.world().nfts.interceptor().index().count(user(1)), 0);
        Ok(())
    }

    // =============================================================================
    // FAILURES ROLL BACK EVERY LEDGER
    // =============================================================================

    #[test]
    fn test_token_failure_rolls_back_hbar_leg() {
        let stores = WorldBuilder::standard(2)
            .frozen_rel(user(0), FT, UNITS_PER_REL)
            .build();
        let before = total_hbar(&stores);
        let mut ledger = ledger_over(&stores, TransferConfig::default());

        ledger.begin(NOW);
        let code = failed_code(ledger.transfer(
            &hbar(user(0), user(1), 7),
            &[units(user(0), user(1), 1)],
            PAYER,
        ));
        assert_eq!(code, ResponseCode::AccountFrozenForToken);

        ledger.rollback();
        assert!(!ledger.world().are_in_transaction());
        assert_eq!(ledger.balance_of(user(1)).unwrap(), HBAR_PER_ACCOUNT);
        assert_eq!(total_hbar(&stores), before);
    }

    #[test]
    fn test_unexpected_decimals() {
        let mut ledger = WorldBuilder::standard(2).ledger();
        let code = run(
            &mut ledger,
            &[],
            &[units(user(0), user(1), 1).with_expected_decimals(FT_DECIMALS + 1)],
        );
        assert_eq!(code, ResponseCode::UnexpectedTokenDecimals);
    }

    #[test]
    fn test_deleted_and_detached_accounts() {
        let gone = AccountId(3000);
        let lapsed = AccountId(3001);
        let builder = || {
            WorldBuilder::standard(1)
                .deleted_account(gone)
                .detached_account(lapsed)
        };

        let mut ledger = builder().ledger();
        assert_eq!(
            run(&mut ledger, &hbar(user(0), gone, 1), &[]),
            ResponseCode::AccountDeleted
        );
        assert_eq!(
            run(&mut ledger, &hbar(user(0), lapsed, 1), &[]),
            ResponseCode::AccountExpiredAndPendingRemoval
        );

        let lenient = TransferConfig {
            expiry_enforced: false,
            ..Default::default()
        };
        let mut ledger = builder().ledger_with(lenient);
        assert_eq!(run(&mut ledger, &hbar(user(0), lapsed, 1), &[]), ResponseCode::Ok);
        assert_eq!(ledger.balance_of(lapsed).unwrap(), 1);
    }

    #[test]
    fn test_nfts_disabled_by_config() {
        let config = TransferConfig::from_json(r#"{"nfts_enabled": false}"#).unwrap();
        let mut ledger = WorldBuilder::standard(2).ledger_with(config);

        ledger.begin(NOW);
        let code = failed_code(ledger.transfer(
            &[],
            &[TokenTransferList::nft(NFT, vec![NftTransfer::new(user(0), user(1), 1)])],
            PAYER,
        ));
        assert_eq!(code, ResponseCode::NotSupported);
        assert_eq!(ledger.world().nfts.touched_ids().count(), 0);
        ledger.rollback();
    }

    // =============================================================================
    // ALIASES
    // =============================================================================

    #[test]
    fn test_alias_created_on_credit_then_spendable() -> anyhow::Result<()> {
        let mut ledger = WorldBuilder::standard(1).ledger();
        let alias = Alias::new(vec![0x02; 33]);
        let created = AccountId(FIRST_NEW_ID);

        assert_eq!(
            run(&mut ledger, &hbar(user(0), alias.clone(), 1_000), &[]),
            ResponseCode::Ok
        );
        assert_eq!(ledger.aliases().lookup(&alias), Some(created));
        assert_eq!(
            ledger.world().accounts.get(&created, AccountProperty::Memo)?,
            PropertyValue::Text("auto-created account".into())
        );

        let back = [
            AccountAmount::new(alias.clone(), -400),
            AccountAmount::new(user(0), 400),
        ];
        assert_eq!(run(&mut ledger, &back, &[]), ResponseCode::Ok);
        assert_eq!(ledger.balance_of(created)?, 600);
        Ok(())
    }

    #[test]
    fn test_token_credit_to_new_alias_is_not_associated() {
        let mut ledger = WorldBuilder::standard(1).ledger();
        let alias = Alias::new(vec![0x03; 33]);

        let code = run(&mut ledger, &[], &[units(user(0), alias.clone(), 5)]);

        assert_eq!(code, ResponseCode::TokenNotAssociatedToAccount);
        assert!(ledger.aliases().lookup(&alias).is_none());
        assert!(!ledger.exists(AccountId(FIRST_NEW_ID)));
        assert_eq!(ledger.token_balance_of(user(0), FT).unwrap(), UNITS_PER_REL);
    }

    #[test]
    fn test_alias_rejected_when_auto_creation_disabled() {
        let config = TransferConfig {
            auto_creation_enabled: false,
            ..Default::default()
        };
        let mut ledger = WorldBuilder::standard(1).ledger_with(config);
        let alias = Alias::new(vec![0x04; 33]);
        assert_eq!(
            run(&mut ledger, &hbar(user(0), alias, 1), &[]),
            ResponseCode::NotSupported
        );
    }

    #[test]
    fn test_aliases_survive_a_ledger_restart() -> anyhow::Result<()> {
        let stores = WorldBuilder::standard(3).build();
        let alias = Alias::new(vec![0x05; 33]);
        let created = AccountId(user(2).0 + 1);

        let mut ledger = HederaLedger::new(stores.clone(), TransferConfig::default());
        assert_eq!(
            run(&mut ledger, &hbar(user(0), alias.clone(), 500), &[]),
            ResponseCode::Ok
        );
        assert_eq!(ledger.aliases().lookup(&alias), Some(created));
        let accounts = stores.accounts.size();

        let mut restarted = HederaLedger::new(stores.clone(), TransferConfig::default());
        assert_eq!(
            run(&mut restarted, &hbar(user(1), alias.clone(), 500), &[]),
            ResponseCode::Ok
        );
        assert_eq!(stores.accounts.size(), accounts);
        assert_eq!(restarted.balance_of(created)?, 1_000);
        Ok(())
    }

    // =============================================================================
    // INVARIANTS UNDER LOAD
    // =============================================================================

    #[test]
    fn test_random_transfers_conserve_supply() {
        const USERS: u64 = 8;
        let stores = WorldBuilder::standard(USERS).build();
        let hbar_supply = total_hbar(&stores);
        let ft_supply = total_units(&stores, FT);
        let mut ledger = ledger_over(&stores, TransferConfig::default());
        let mut rng = StdRng::seed_from_u64(7);

        let mut outcomes = BTreeMap::new();
        for _ in 0..300 {
            let (a, b) = (rng.gen_range(0..USERS), rng.gen_range(0..USERS));
            let (c, d) = (rng.gen_range(0..USERS), rng.gen_range(0..USERS));
            if a == b || c == d {
                continue;
            }
            let tinybars = rng.gen_range(1..HBAR_PER_ACCOUNT);
            let amount = rng.gen_range(1..UNITS_PER_REL);
            let code = run(
                &mut ledger,
                &hbar(user(a), user(b), tinybars),
                &[units(user(c), user(d), amount)],
            );
            *outcomes.entry(code.as_str()).or_insert(0) += 1;

            assert_eq!(total_hbar(&stores), hbar_supply);
            assert_eq!(total_units(&stores, FT), ft_supply);
        }

        assert!(outcomes.contains_key("OK"));
        for code in outcomes.keys() {
            assert!(
                ["OK", "INSUFFICIENT_ACCOUNT_BALANCE", "INSUFFICIENT_TOKEN_BALANCE"]
                    .contains(code),
                "unexpected outcome {}",
                code
            );
        }
    }

    #[test]
    fn test_outcomes_are_counted() {
        let committed = TRANSFERS_PROCESSED.with_label_values(&["committed"]).get();
        let rejected = TRANSFERS_PROCESSED.with_label_values(&["rejected"]).get();

        let mut ledger = WorldBuilder::standard(2).ledger();
        assert_eq!(run(&mut ledger, &hbar(user(0), user(1), 1), &[]), ResponseCode::Ok);
        assert_eq!(
            run(&mut ledger, &hbar(user(0), user(1), HBAR_PER_ACCOUNT * 2), &[]),
            ResponseCode::InsufficientAccountBalance
        );

        assert!(TRANSFERS_PROCESSED.with_label_values(&["committed"]).get() > committed);
        assert!(TRANSFERS_PROCESSED.with_label_values(&["rejected"]).get() > rejected);
    }
}
