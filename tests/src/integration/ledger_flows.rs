//! # Ledger Flows
//!
//! The accounts ledger, with its real entity and interceptor, over a store
//! that records every write. Covers the persistence contract a transfer
//! relies on: write ordering, zombie cancellation, resurrection and the
//! open transaction left behind by a failed put.

#[cfg(test)]
mod tests {
    use ledger_core::{BackingStore, LedgerError, RecordingStore, StoreOp, TransactionalLedger};
    use ledger_transfers::interceptors::AccountsCommitInterceptor;
    use ledger_transfers::AccountProperty;
    use proptest::prelude::*;
    use shared_types::{Account, AccountId};

    type RecordedAccounts = TransactionalLedger<
        AccountId,
        AccountProperty,
        RecordingStore<AccountId, Account>,
        AccountsCommitInterceptor,
    >;

    fn funded(balance: i64) -> Account {
        Account {
            balance,
            expiry: 1_000_000,
            ..Default::default()
        }
    }

    fn ledger_with(ids: &[u64]) -> RecordedAccounts {
        let mut store = RecordingStore::new();
        for id in ids {
            store.seed(AccountId(*id), funded(100));
        }
        RecordedAccounts::with_interceptor("accounts", store, AccountsCommitInterceptor::new())
    }

    #[test]
    fn test_creations_persist_in_insertion_order() {
        let mut ledger = ledger_with(&[]);
        ledger.begin();
        for id in 2..100 {
            ledger.create(AccountId(id)).unwrap();
            ledger.set(&AccountId(id), AccountProperty::Balance, 1i64).unwrap();
        }
        ledger.commit().unwrap();

        let expected: Vec<AccountId> = (2..100).map(AccountId).collect();
        assert_eq!(ledger.store().put_ids(), expected);
        assert_eq!(
            ledger.interceptor_mut().drain_adjustments().len(),
            expected.len()
        );
    }

    #[test]
    fn test_zombie_never_reaches_store() {
        let mut ledger = ledger_with(&[]);
        ledger.begin();
        ledger.create(AccountId(1)).unwrap();
        ledger.destroy(&AccountId(1)).unwrap();
        ledger.commit().unwrap();

        assert!(ledger.store().ops().is_empty());
    }

    #[test]
    fn test_resurrected_account_is_put_once() {
        let mut ledger = ledger_with(&[]);
        ledger.begin();
        ledger.create(AccountId(1)).unwrap();
        ledger.destroy(&AccountId(1)).unwrap();
        ledger.put(AccountId(1), &funded(42)).unwrap();
        ledger.commit().unwrap();

        assert_eq!(ledger.store().ops(), &[StoreOp::Put(AccountId(1))]);
        assert_eq!(ledger.store().get(&AccountId(1)).unwrap().balance, 42);
    }

    #[test]
    fn test_removal_reported_as_negative_delta() {
        let mut ledger = ledger_with(&[7]);
        ledger.begin();
        ledger.destroy(&AccountId(7)).unwrap();
        ledger.commit().unwrap();

        assert_eq!(ledger.store().removed_ids(), vec![AccountId(7)]);
        let deltas = ledger.interceptor_mut().drain_adjustments();
        assert_eq!(deltas.get(&AccountId(7)), Some(&-100));
    }

    #[test]
    fn test_failed_put_leaves_transaction_open() {
        let mut ledger = ledger_with(&[1, 2, 3]);
        ledger.store_mut().fail_puts_for(AccountId(2));

        ledger.begin();
        for id in 1..=3 {
            ledger
                .set(&AccountId(id), AccountProperty::Balance, 50i64)
                .unwrap();
        }
        let err = ledger.commit().unwrap_err();

        assert!(matches!(err, LedgerError::CommitFailed { .. }));
        assert!(err.requires_rollback());
        assert!(ledger.is_in_transaction());
        // Puts that landed before the failure stay applied.
        assert_eq!(ledger.store().put_ids(), vec![AccountId(1)]);

        ledger.rollback().unwrap();
        assert!(!ledger.is_in_transaction());
        assert_eq!(ledger.store().get(&AccountId(3)).unwrap().balance, 100);
    }

    proptest! {
        #[test]
        fn prop_rolled_back_balances_never_persist(
            sets in proptest::collection::vec((1u64..6, 0i64..1_000), 0..40)
        ) {
            let mut ledger = ledger_with(&[1, 2, 3, 4, 5]);
            ledger.begin();
            for (id, balance) in &sets {
                ledger.set(&AccountId(*id), AccountProperty::Balance, *balance).unwrap();
            }
            ledger.rollback().unwrap();

            prop_assert!(ledger.store().ops().is_empty());
            for id in 1..6 {
                prop_assert_eq!(ledger.store().get(&AccountId(id)).unwrap().balance, 100);
            }
        }
    }
}
