//! Hbar deltas of an accounts commit.

use std::collections::BTreeMap;

use ledger_core::{CommitInterceptor, EntityChangeSet, LedgerError};
use shared_types::{AccountId, PropertyValue};

use crate::domain::AccountProperty;

/// Net balance change per account in `pending`, zero deltas omitted.
///
/// A removal counts as a debit of the whole stored balance.
pub fn hbar_deltas(pending: &EntityChangeSet<AccountId, AccountProperty>) -> BTreeMap<AccountId, i64> {
    let mut deltas = BTreeMap::new();
    for entry in pending.iter() {
        let old = entry.entity.as_ref().map_or(0, |account| account.balance);
        let new = match &entry.changes {
            None => 0,
            Some(changes) => match changes.get(&AccountProperty::Balance) {
                Some(PropertyValue::Long(balance)) => *balance,
                _ => continue,
            },
        };
        let delta = new - old;
        if delta != 0 {
            *deltas.entry(entry.id).or_insert(0) += delta;
        }
    }
    deltas
}

#[derive(Debug, Default)]
pub struct AccountsCommitInterceptor {
    adjustments: BTreeMap<AccountId, i64>,
}

impl AccountsCommitInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deltas of the last previewed commit; empties the buffer.
    pub fn drain_adjustments(&mut self) -> BTreeMap<AccountId, i64> {
        std::mem::take(&mut self.adjustments)
    }
}

impl CommitInterceptor<AccountId, AccountProperty> for AccountsCommitInterceptor {
    fn begin(&mut self) {
        self.adjustments.clear();
    }

    fn preview(
        &mut self,
        pending: &EntityChangeSet<AccountId, AccountProperty>,
    ) -> Result<(), LedgerError> {
        self.adjustments = hbar_deltas(pending);
        Ok(())
    }
}
