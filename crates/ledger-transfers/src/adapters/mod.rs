//! # Adapters Layer
//!
//! - `id_source.rs` - In-process `EntityIdSource`

pub mod id_source;

pub use id_source::SeqNoEntityIdSource;
