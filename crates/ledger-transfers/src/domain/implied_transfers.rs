//! # Implied Transfers
//!
//! Turns validated transfer lists into the `BalanceChange`s a zero-sum
//! application will apply. Hbar entries come first, then each token list in
//! order. Repeated (account, token) amounts collapse into a single change;
//! every NFT move stays its own change.

use std::collections::HashMap;

use shared_types::{AccountId, ResponseCode, TokenId};
use tracing::debug;

use crate::config::TransferConfig;
use crate::domain::balance_change::BalanceChange;
use crate::domain::pure_checks::TransferSemanticChecks;
use crate::domain::transfer_list::{AccountAmount, AccountRef, TokenTransferList};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpliedTransfers {
    /// `OK`, or the first failure found while validating or marshalling.
    pub code: ResponseCode,
    /// Empty unless `code` is `OK`.
    pub changes: Vec<BalanceChange>,
}

impl ImpliedTransfers {
    fn invalid(code: ResponseCode) -> Self {
        Self {
            code,
            changes: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }

    /// Validate the lists with `checks`, then aggregate them.
    pub fn from_lists<C>(
        hbar_adjusts: &[AccountAmount],
        token_adjusts: &[TokenTransferList],
        payer: AccountId,
        config: &TransferConfig,
        checks: &C,
    ) -> Self
    where
        C: TransferSemanticChecks + ?Sized,
    {
        let validity = checks.full_pure_validation(hbar_adjusts, token_adjusts, config);
        if validity != ResponseCode::Ok {
            debug!(code = %validity, "transfer lists failed pure validation");
            return Self::invalid(validity);
        }

        if !config.auto_creation_enabled && mentions_alias(hbar_adjusts, token_adjusts) {
            return Self::invalid(ResponseCode::NotSupported);
        }

        let mut builder = ChangeBuilder::new(payer);
        for aa in hbar_adjusts {
            let Some(account) = &aa.account else {
                return Self::invalid(ResponseCode::InvalidAccountId);
            };
            builder.append_adjust(account, None, aa.amount, aa.is_approval, None);
        }
        for list in token_adjusts {
            // Pure validation guarantees every list names its token.
            let Some(token) = list.token else {
                return Self::invalid(ResponseCode::InvalidTokenId);
            };
            for aa in &list.transfers {
                let Some(account) = &aa.account else {
                    return Self::invalid(ResponseCode::InvalidAccountId);
                };
                builder.append_adjust(
                    account,
                    Some(token),
                    aa.amount,
                    aa.is_approval,
                    list.expected_decimals,
                );
            }
            for nft in &list.nft_transfers {
                let (Some(sender), Some(receiver)) = (&nft.sender, &nft.receiver) else {
                    return Self::invalid(ResponseCode::InvalidAccountId);
                };
                let mut change = BalanceChange::nft_move(
                    token.nft(nft.serial),
                    sender.clone(),
                    receiver.clone(),
                    payer,
                );
                change.is_approval = nft.is_approval;
                builder.changes.push(change);
            }
        }

        if builder.changes.len() > config.max_balance_changes {
            return Self::invalid(ResponseCode::TransferListSizeLimitExceeded);
        }
        Self {
            code: ResponseCode::Ok,
            changes: builder.changes,
        }
    }
}

fn mentions_alias(hbar_adjusts: &[AccountAmount], token_adjusts: &[TokenTransferList]) -> bool {
    let is_alias = |account: &Option<AccountRef>| account.as_ref().is_some_and(AccountRef::is_alias);
    hbar_adjusts.iter().any(|aa| is_alias(&aa.account))
        || token_adjusts.iter().any(|list| {
            list.transfers.iter().any(|aa| is_alias(&aa.account))
                || list
                    .nft_transfers
                    .iter()
                    .any(|nft| is_alias(&nft.sender) || is_alias(&nft.receiver))
        })
}

struct ChangeBuilder {
    payer: AccountId,
    changes: Vec<BalanceChange>,
    index: HashMap<(AccountRef, Option<TokenId>), usize>,
}

impl ChangeBuilder {
    fn new(payer: AccountId) -> Self {
        Self {
            payer,
            changes: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn append_adjust(
        &mut self,
        account: &AccountRef,
        token: Option<TokenId>,
        amount: i64,
        is_approval: bool,
        expected_decimals: Option<u32>,
    ) {
        let key = (account.clone(), token);
        if let Some(&i) = self.index.get(&key) {
            let existing = &mut self.changes[i];
            existing.aggregate_units(amount);
            if is_approval {
                existing.is_approval = true;
                if amount < 0 {
                    existing.add_allowance_units(amount);
                }
            }
            return;
        }

        let change = match token {
            Some(token) => BalanceChange::token_adjust(token, account.clone(), amount, self.payer)
                .with_expected_decimals(expected_decimals),
            None => BalanceChange::hbar(account.clone(), amount, self.payer),
        };
        let change = if is_approval { change.approved() } else { change };
        self.index.insert(key, self.changes.len());
        self.changes.push(change);
    }
}
