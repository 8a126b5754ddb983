//! # Ports Layer
//!
//! - `outbound.rs` - Driven ports (dependencies the transfer layer requires)

pub mod outbound;

pub use outbound::EntityIdSource;
