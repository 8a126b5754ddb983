//! # Commit Interceptors
//!
//! One interceptor per ledger that needs to observe its commits.
//!
//! | Interceptor | Ledger | Effect |
//! |-------------|--------|--------|
//! | `AccountsCommitInterceptor` | accounts | hbar deltas for the transfer record |
//! | `TokenRelsCommitInterceptor` | token_rels | token unit deltas for the transfer record |
//! | `UniqueTokensCommitInterceptor` | nfts | owner index upkeep, removal of burned serials |

pub mod accounts;
pub mod token_rels;
pub mod unique_tokens;

pub use accounts::{hbar_deltas, AccountsCommitInterceptor};
pub use token_rels::{token_deltas, TokenRelsCommitInterceptor};
pub use unique_tokens::{NftOwnershipIndex, UniqueTokensCommitInterceptor};
