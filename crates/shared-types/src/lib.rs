//! # Shared Types Crate
//!
//! Entity ids, entity records and response codes shared by the ledger
//! engine (`ledger-core`) and the transfer logic (`ledger-transfers`).
//!
//! ## Contents
//!
//! - **Ids**: `AccountId`, `TokenId`, `NftId`, `TokenRelKey`, `Alias`
//! - **Entities**: `Account`, `TokenRelationship`, `UniqueToken`, `Token`
//! - **Values**: `PropertyValue`, the closed sum type carried by pending changes
//! - **Codes**: `ResponseCode`, the outcome of every domain validation

pub mod entities;
pub mod ids;
pub mod response_code;
pub mod values;

pub use entities::*;
pub use ids::*;
pub use response_code::ResponseCode;
pub use values::PropertyValue;
