//! Token unit deltas of a token relationships commit.

use std::collections::BTreeMap;

use ledger_core::{CommitInterceptor, EntityChangeSet, LedgerError};
use shared_types::{AccountId, PropertyValue, TokenId, TokenRelKey};

use crate::domain::TokenRelProperty;

pub type TokenDeltas = BTreeMap<TokenId, BTreeMap<AccountId, i64>>;

/// Net unit change per token and account in `pending`, zero deltas omitted.
pub fn token_deltas(pending: &EntityChangeSet<TokenRelKey, TokenRelProperty>) -> TokenDeltas {
    let mut deltas = TokenDeltas::new();
    for entry in pending.iter() {
        let old = entry.entity.as_ref().map_or(0, |rel| rel.balance);
        let new = match &entry.changes {
            None => 0,
            Some(changes) => match changes.get(&TokenRelProperty::TokenBalance) {
                Some(PropertyValue::Long(balance)) => *balance,
                _ => continue,
            },
        };
        let delta = new - old;
        if delta != 0 {
            *deltas
                .entry(entry.id.token)
                .or_default()
                .entry(entry.id.account)
                .or_insert(0) += delta;
        }
    }
    deltas
}

#[derive(Debug, Default)]
pub struct TokenRelsCommitInterceptor {
    adjustments: TokenDeltas,
}

impl TokenRelsCommitInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain_adjustments(&mut self) -> TokenDeltas {
        std::mem::take(&mut self.adjustments)
    }
}

impl CommitInterceptor<TokenRelKey, TokenRelProperty> for TokenRelsCommitInterceptor {
    fn begin(&mut self) {
        self.adjustments.clear();
    }

    fn preview(
        &mut self,
        pending: &EntityChangeSet<TokenRelKey, TokenRelProperty>,
    ) -> Result<(), LedgerError> {
        self.adjustments = token_deltas(pending);
        Ok(())
    }
}
