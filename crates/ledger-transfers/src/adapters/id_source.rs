//! Sequence-number backed entity id source.

use shared_types::AccountId;
use tracing::debug;

use crate::ports::EntityIdSource;

/// Lowest number handed to a user account.
pub const FIRST_USER_ACCOUNT: u64 = 1001;

/// Hands out consecutive account numbers starting at `first`.
#[derive(Debug, Clone)]
pub struct SeqNoEntityIdSource {
    next: u64,
    provisional: u64,
}

impl SeqNoEntityIdSource {
    pub fn new(first: u64) -> Self {
        Self {
            next: first,
            provisional: 0,
        }
    }

    /// Start after the highest of `existing`, never below
    /// `FIRST_USER_ACCOUNT`.
    pub fn following(existing: impl IntoIterator<Item = AccountId>) -> Self {
        let first = existing
            .into_iter()
            .map(|id| id.0.saturating_add(1))
            .fold(FIRST_USER_ACCOUNT, u64::max);
        Self::new(first)
    }

    /// The number the next allocation will use.
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn provisional_count(&self) -> u64 {
        self.provisional
    }
}

impl Default for SeqNoEntityIdSource {
    fn default() -> Self {
        Self::new(FIRST_USER_ACCOUNT)
    }
}

impl EntityIdSource for SeqNoEntityIdSource {
    fn new_account_id(&mut self) -> AccountId {
        let id = AccountId(self.next);
        self.next += 1;
        self.provisional += 1;
        id
    }

    fn reclaim_provisional_ids(&mut self) {
        if self.provisional > 0 {
            debug!(
                reclaimed = self.provisional,
                next = self.next - self.provisional,
                "provisional ids reclaimed"
            );
        }
        self.next -= self.provisional;
        self.provisional = 0;
    }

    fn reset_provisional_ids(&mut self) {
        self.provisional = 0;
    }
}
