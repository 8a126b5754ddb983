//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the transfer layer requires from its host.

use shared_types::AccountId;

/// Source of new entity numbers.
///
/// Production: the node's sequence-number allocator.
/// Testing: `SeqNoEntityIdSource` (adapters/id_source.rs)
///
/// Ids handed out since the last `reset_provisional_ids` are provisional:
/// `reclaim_provisional_ids` returns them for reuse when the transaction
/// that used them fails.
pub trait EntityIdSource {
    fn new_account_id(&mut self) -> AccountId;

    /// Give back every provisional id.
    fn reclaim_provisional_ids(&mut self);

    /// Make every provisional id permanent.
    fn reset_provisional_ids(&mut self);
}
