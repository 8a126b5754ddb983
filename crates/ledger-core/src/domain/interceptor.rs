//! # Commit Interceptors
//!
//! A hook bound to one ledger for its lifetime. It observes each commit
//! without owning the commit decision:
//!
//! 0. `begin` runs whenever the ledger opens a transaction and drops any
//!    buffer left from an earlier one.
//! 1. `preview` sees the full pending change set before anything is written
//!    and may refuse it, which leaves the transaction open.
//! 2. `finish` runs once per persisted update, in commit order.
//! 3. `post_commit` runs once after the last write. It may write to the
//!    store itself; a failure there fails the commit like any other write.
//!
//! An interceptor that returns `true` from `completes_pending_removals` takes
//! over removal of destroyed entities; the ledger then skips its own
//! `remove` calls for that commit.

use crate::domain::change_set::EntityChangeSet;
use crate::domain::errors::LedgerError;
use crate::domain::property::Property;
use crate::ports::StoreError;

pub trait CommitInterceptor<K, P: Property> {
    fn begin(&mut self) {}

    fn preview(&mut self, _pending: &EntityChangeSet<K, P>) -> Result<(), LedgerError> {
        Ok(())
    }

    fn finish(&mut self, _index: usize, _committed: &P::Entity) {}

    fn post_commit(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn completes_pending_removals(&self) -> bool {
        false
    }
}

/// Interceptor that observes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCommitInterceptor;

impl<K, P: Property> CommitInterceptor<K, P> for NoopCommitInterceptor {}
