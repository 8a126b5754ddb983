//! # Ledger Test Suite
//!
//! Cross-crate test crate.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # World builders shared by flows and benchmarks
//! ├── benchmarks/       # Criterion benchmark bodies
//! │   ├── ledger_commit.rs
//! │   └── transfer_validation.rs
//! │
//! └── integration/      # Multi-ledger flows
//!     ├── ledger_flows.rs
//!     └── transfer_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ledger-tests
//!
//! # By category
//! cargo test -p ledger-tests integration::transfer_flows::
//!
//! # Benchmarks
//! cargo bench -p ledger-tests
//! ```

pub mod benchmarks;
pub mod fixtures;
pub mod integration;
