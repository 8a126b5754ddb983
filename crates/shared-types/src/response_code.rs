//! # Response Codes
//!
//! Domain validation never fails with an error value; it resolves to one of
//! these codes, which the transaction-processing layer turns into a receipt
//! status.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! response_codes {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ResponseCode {
            $($variant),+
        }

        impl ResponseCode {
            /// Canonical upper-case name of the code.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ResponseCode::$variant => $name),+
                }
            }
        }
    };
}

response_codes! {
    Ok => "OK",
    FailInvalid => "FAIL_INVALID",
    InvalidAccountId => "INVALID_ACCOUNT_ID",
    InvalidTokenId => "INVALID_TOKEN_ID",
    InvalidNftId => "INVALID_NFT_ID",
    TokenNotAssociatedToAccount => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
    AccountDeleted => "ACCOUNT_DELETED",
    AccountExpiredAndPendingRemoval => "ACCOUNT_EXPIRED_AND_PENDING_REMOVAL",
    InsufficientAccountBalance => "INSUFFICIENT_ACCOUNT_BALANCE",
    SpenderDoesNotHaveAllowance => "SPENDER_DOES_NOT_HAVE_ALLOWANCE",
    AmountExceedsAllowance => "AMOUNT_EXCEEDS_ALLOWANCE",
    AccountRepeatedInAccountAmounts => "ACCOUNT_REPEATED_IN_ACCOUNT_AMOUNTS",
    InvalidAccountAmounts => "INVALID_ACCOUNT_AMOUNTS",
    TransferListSizeLimitExceeded => "TRANSFER_LIST_SIZE_LIMIT_EXCEEDED",
    TokenTransferListSizeLimitExceeded => "TOKEN_TRANSFER_LIST_SIZE_LIMIT_EXCEEDED",
    EmptyTokenTransferAccountAmounts => "EMPTY_TOKEN_TRANSFER_ACCOUNT_AMOUNTS",
    BatchSizeLimitExceeded => "BATCH_SIZE_LIMIT_EXCEEDED",
    NotSupported => "NOT_SUPPORTED",
    TransfersNotZeroSumForToken => "TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN",
    TokenIdRepeatedInTokenList => "TOKEN_ID_REPEATED_IN_TOKEN_LIST",
    AccountFrozenForToken => "ACCOUNT_FROZEN_FOR_TOKEN",
    AccountKycNotGrantedForToken => "ACCOUNT_KYC_NOT_GRANTED_FOR_TOKEN",
    InsufficientTokenBalance => "INSUFFICIENT_TOKEN_BALANCE",
    SenderDoesNotOwnNftSerialNo => "SENDER_DOES_NOT_OWN_NFT_SERIAL_NO",
    TokenWasDeleted => "TOKEN_WAS_DELETED",
    TokenIsPaused => "TOKEN_IS_PAUSED",
    UnexpectedTokenDecimals => "UNEXPECTED_TOKEN_DECIMALS",
    AccountAmountTransfersOnlyAllowedForFungibleCommon =>
        "ACCOUNT_AMOUNT_TRANSFERS_ONLY_ALLOWED_FOR_FUNGIBLE_COMMON",
}

impl ResponseCode {
    pub fn is_ok(&self) -> bool {
        *self == ResponseCode::Ok
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
