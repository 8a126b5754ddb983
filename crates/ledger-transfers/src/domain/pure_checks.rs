//! # Pure Transfer Checks
//!
//! Validation that needs nothing but the transfer lists and the configured
//! limits. Stages run in a fixed order and the first failure wins:
//!
//! | # | Stage | Failure |
//! |---|-------|---------|
//! | 1 | repeated hbar account | `ACCOUNT_REPEATED_IN_ACCOUNT_AMOUNTS` |
//! | 2 | hbar amounts net to zero | `INVALID_ACCOUNT_AMOUNTS` |
//! | 3 | hbar list size | `TRANSFER_LIST_SIZE_LIMIT_EXCEEDED` |
//! | 4 | approved hbar debits while allowances are off | `NOT_SUPPORTED` |
//! | 5 | token list syntax | size, shape or `NOT_SUPPORTED` codes |
//! | 6 | token list semantics | id, repeat and zero-sum codes |
//!
//! Approved token and NFT entries are refused inside the syntax stage, per
//! list, so a malformed earlier list still reports its own code first.

use std::collections::HashSet;

use shared_types::{ResponseCode, TokenId};

use crate::config::TransferConfig;
use crate::domain::transfer_list::{AccountAmount, AccountRef, NftTransfer, TokenTransferList};

/// The individual stages are trait methods so that a caller can observe or
/// replace any one of them while keeping the ordering of
/// [`full_pure_validation`](TransferSemanticChecks::full_pure_validation).
pub trait TransferSemanticChecks {
    fn full_pure_validation(
        &self,
        hbar_adjusts: &[AccountAmount],
        token_adjusts: &[TokenTransferList],
        config: &TransferConfig,
    ) -> ResponseCode {
        if self.has_repeated_account(hbar_adjusts) {
            return ResponseCode::AccountRepeatedInAccountAmounts;
        }
        if !self.is_net_zero_adjustment(hbar_adjusts) {
            return ResponseCode::InvalidAccountAmounts;
        }
        if !self.is_acceptable_size(hbar_adjusts, config.max_hbar_adjusts) {
            return ResponseCode::TransferListSizeLimitExceeded;
        }
        if !config.allowances_enabled && has_allowance_transfers(hbar_adjusts) {
            return ResponseCode::NotSupported;
        }

        let syntax = self.validate_token_transfer_syntax(
            token_adjusts,
            config.max_token_adjusts,
            config.max_ownership_changes,
            config.nfts_enabled,
            config.allowances_enabled,
        );
        if syntax != ResponseCode::Ok {
            return syntax;
        }
        self.validate_token_transfer_semantics(token_adjusts)
    }

    /// True if any account appears twice with the same approval flag.
    fn has_repeated_account(&self, adjusts: &[AccountAmount]) -> bool {
        let mut seen: HashSet<(Option<&AccountRef>, bool)> = HashSet::with_capacity(adjusts.len());
        adjusts
            .iter()
            .any(|aa| !seen.insert((aa.account.as_ref(), aa.is_approval)))
    }

    fn is_net_zero_adjustment(&self, adjusts: &[AccountAmount]) -> bool {
        adjusts.iter().map(|aa| i128::from(aa.amount)).sum::<i128>() == 0
    }

    fn is_acceptable_size(&self, adjusts: &[AccountAmount], max_len: usize) -> bool {
        adjusts.len() <= max_len
    }

    fn validate_token_transfer_syntax(
        &self,
        token_adjusts: &[TokenTransferList],
        max_list_len: usize,
        max_ownership_changes: usize,
        nfts_enabled: bool,
        allowances_enabled: bool,
    ) -> ResponseCode {
        if token_adjusts.is_empty() {
            return ResponseCode::Ok;
        }
        if token_adjusts.len() > max_list_len {
            return ResponseCode::TokenTransferListSizeLimitExceeded;
        }

        let mut fungible_count = 0usize;
        let mut ownership_changes = 0usize;
        for list in token_adjusts {
            if list.has_nft_transfers() {
                if !nfts_enabled {
                    return ResponseCode::NotSupported;
                }
                if !allowances_enabled && has_allowance_nft_transfers(&list.nft_transfers) {
                    return ResponseCode::NotSupported;
                }
                if !list.transfers.is_empty() {
                    return ResponseCode::InvalidAccountAmounts;
                }
                if has_repeated_serial(&list.nft_transfers) {
                    return ResponseCode::InvalidAccountAmounts;
                }
                ownership_changes += list.nft_transfers.len();
            } else {
                if list.transfers.is_empty() {
                    return ResponseCode::EmptyTokenTransferAccountAmounts;
                }
                if !allowances_enabled && has_allowance_transfers(&list.transfers) {
                    return ResponseCode::NotSupported;
                }
                fungible_count += list.transfers.len();
            }
        }

        if ownership_changes > max_ownership_changes {
            return ResponseCode::BatchSizeLimitExceeded;
        }
        if fungible_count > max_list_len {
            return ResponseCode::TokenTransferListSizeLimitExceeded;
        }
        ResponseCode::Ok
    }

    fn validate_token_transfer_semantics(&self, token_adjusts: &[TokenTransferList]) -> ResponseCode {
        let mut tokens: HashSet<TokenId> = HashSet::with_capacity(token_adjusts.len());
        for list in token_adjusts {
            let Some(token) = list.token else {
                return ResponseCode::InvalidTokenId;
            };

            for nft in &list.nft_transfers {
                match (&nft.sender, &nft.receiver) {
                    (Some(sender), Some(receiver)) if sender == receiver => {
                        return ResponseCode::AccountRepeatedInAccountAmounts;
                    }
                    (Some(_), Some(_)) => {}
                    _ => return ResponseCode::InvalidAccountId,
                }
            }

            if list.transfers.iter().any(|aa| aa.account.is_none()) {
                return ResponseCode::InvalidAccountId;
            }
            if self.has_repeated_account(&list.transfers) {
                return ResponseCode::AccountRepeatedInAccountAmounts;
            }
            if !self.is_net_zero_adjustment(&list.transfers) {
                return ResponseCode::TransfersNotZeroSumForToken;
            }
            tokens.insert(token);
        }

        if tokens.len() < token_adjusts.len() {
            return ResponseCode::TokenIdRepeatedInTokenList;
        }
        ResponseCode::Ok
    }
}

/// The stock stage implementations.
#[derive(Debug, Default, Clone, Copy)]
pub struct PureTransferSemanticChecks;

impl TransferSemanticChecks for PureTransferSemanticChecks {}

pub fn has_allowance_transfers(adjusts: &[AccountAmount]) -> bool {
    adjusts.iter().any(|aa| aa.is_approval)
}

pub fn has_allowance_nft_transfers(transfers: &[NftTransfer]) -> bool {
    transfers.iter().any(|nft| nft.is_approval)
}

fn has_repeated_serial(transfers: &[NftTransfer]) -> bool {
    let mut serials = HashSet::with_capacity(transfers.len());
    transfers.iter().any(|nft| !serials.insert(nft.serial))
}
