//! # Scoped Checks
//!
//! Guard chains run against the merged (stored + pending) state of one
//! entity. The first failing guard decides the code.

use ledger_core::{LedgerCheck, PropertyView};
use shared_types::{AccountId, PropertyValue, ResponseCode, TokenType};

use crate::domain::balance_change::BalanceChange;
use crate::domain::properties::{
    token_type_of, AccountProperty, NftProperty, TokenProperty, TokenRelProperty,
};

/// Usability of the account behind one balance change.
///
/// Order: deleted, expired, then for hbar only: balance, allowance present,
/// allowance large enough.
#[derive(Debug, Clone)]
pub struct AccountScopedCheck {
    pub units: i64,
    pub allowance_units: i64,
    pub is_approval: bool,
    pub is_hbar: bool,
    pub payer: AccountId,
    pub now: i64,
    pub expiry_enforced: bool,
}

impl AccountScopedCheck {
    pub fn for_change(change: &BalanceChange, now: i64, expiry_enforced: bool) -> Self {
        Self {
            units: change.units,
            allowance_units: change.allowance_units,
            is_approval: change.is_approval,
            is_hbar: change.is_hbar(),
            payer: change.payer,
            now,
            expiry_enforced,
        }
    }

    fn is_detached(&self, view: &PropertyView<'_, AccountProperty>) -> bool {
        self.expiry_enforced
            && view.get_long(AccountProperty::Balance) == 0
            && view.get_long(AccountProperty::Expiry) <= self.now
    }
}

impl LedgerCheck<AccountProperty> for AccountScopedCheck {
    fn check_using(&self, view: &PropertyView<'_, AccountProperty>) -> ResponseCode {
        if view.get_bool(AccountProperty::IsDeleted) {
            return ResponseCode::AccountDeleted;
        }
        if self.is_detached(view) {
            return ResponseCode::AccountExpiredAndPendingRemoval;
        }
        if !self.is_hbar {
            return ResponseCode::Ok;
        }

        let balance = view.get_long(AccountProperty::Balance);
        if balance.checked_add(self.units).map_or(true, |b| b < 0) {
            return ResponseCode::InsufficientAccountBalance;
        }
        if self.is_approval && self.allowance_units < 0 {
            let PropertyValue::CryptoAllowances(allowances) =
                view.get(AccountProperty::CryptoAllowances)
            else {
                return ResponseCode::SpenderDoesNotHaveAllowance;
            };
            let Some(&allowance) = allowances.get(&self.payer) else {
                return ResponseCode::SpenderDoesNotHaveAllowance;
            };
            if allowance < -self.allowance_units {
                return ResponseCode::AmountExceedsAllowance;
            }
        }
        ResponseCode::Ok
    }
}

/// Frozen, then KYC, then balance.
#[derive(Debug, Clone, Copy)]
pub struct TokenRelScopedCheck {
    pub units: i64,
}

impl LedgerCheck<TokenRelProperty> for TokenRelScopedCheck {
    fn check_using(&self, view: &PropertyView<'_, TokenRelProperty>) -> ResponseCode {
        if view.get_bool(TokenRelProperty::IsFrozen) {
            return ResponseCode::AccountFrozenForToken;
        }
        if !view.get_bool(TokenRelProperty::IsKycGranted) {
            return ResponseCode::AccountKycNotGrantedForToken;
        }
        let balance = view.get_long(TokenRelProperty::TokenBalance);
        if balance.checked_add(self.units).map_or(true, |b| b < 0) {
            return ResponseCode::InsufficientTokenBalance;
        }
        ResponseCode::Ok
    }
}

/// Ownership and spender rights over one serial.
#[derive(Debug, Clone, Copy)]
pub struct NftOwnershipCheck {
    pub sender: AccountId,
    pub treasury: AccountId,
    pub payer: AccountId,
    pub is_approval: bool,
    /// The sender approved the payer for every serial of this token.
    pub approved_for_all: bool,
}

impl LedgerCheck<NftProperty> for NftOwnershipCheck {
    fn check_using(&self, view: &PropertyView<'_, NftProperty>) -> ResponseCode {
        let mut owner = view.get_account(NftProperty::Owner);
        if owner.is_missing() {
            owner = self.treasury;
        }
        if owner != self.sender {
            return ResponseCode::SenderDoesNotOwnNftSerialNo;
        }
        if self.is_approval
            && view.get_account(NftProperty::Spender) != self.payer
            && !self.approved_for_all
        {
            return ResponseCode::SpenderDoesNotHaveAllowance;
        }
        ResponseCode::Ok
    }
}

/// Token usability for one change.
#[derive(Debug, Clone, Copy)]
pub struct TokenCheck {
    pub expected_decimals: Option<u32>,
    pub is_nft_move: bool,
}

impl TokenCheck {
    pub fn for_change(change: &BalanceChange) -> Self {
        Self {
            expected_decimals: change.expected_decimals,
            is_nft_move: change.is_nft(),
        }
    }
}

impl LedgerCheck<TokenProperty> for TokenCheck {
    fn check_using(&self, view: &PropertyView<'_, TokenProperty>) -> ResponseCode {
        if view.get_bool(TokenProperty::IsDeleted) {
            return ResponseCode::TokenWasDeleted;
        }
        if view.get_bool(TokenProperty::IsPaused) {
            return ResponseCode::TokenIsPaused;
        }
        let token_type = token_type_of(&view.get(TokenProperty::TokenType));
        match (token_type, self.is_nft_move) {
            (TokenType::FungibleCommon, true) => return ResponseCode::InvalidNftId,
            (TokenType::NonFungibleUnique, false) => {
                return ResponseCode::AccountAmountTransfersOnlyAllowedForFungibleCommon
            }
            _ => {}
        }
        if let Some(expected) = self.expected_decimals {
            if i64::from(expected) != view.get_long(TokenProperty::Decimals) {
                return ResponseCode::UnexpectedTokenDecimals;
            }
        }
        ResponseCode::Ok
    }
}
