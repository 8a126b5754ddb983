//! # Integration Flows
//!
//! - `ledger_flows.rs` - Domain entities over the recording store
//! - `transfer_flows.rs` - Full transfers through `HederaLedger`

pub mod ledger_flows;
pub mod transfer_flows;
