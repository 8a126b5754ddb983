//! # Alias Auto-Creation
//!
//! A credit to an alias nobody has claimed yet creates the account on the
//! spot. Creations stay provisional until the transaction commits: a failed
//! transfer unlinks the alias and gives the account number back.

use ledger_core::LedgerError;
use shared_types::{AccountId, Alias};
use tracing::{debug, info};

use crate::application::world_ledgers::AccountsLedger;
use crate::domain::{AccountProperty, AliasManager, SideEffectsTracker};
use crate::ports::EntityIdSource;

pub const AUTO_MEMO: &str = "auto-created account";

#[derive(Debug)]
pub struct AutoCreationLogic<E> {
    ids: E,
    auto_renew_period: i64,
    pending_aliases: Vec<Alias>,
}

impl<E: EntityIdSource> AutoCreationLogic<E> {
    pub fn new(ids: E, auto_renew_period: i64) -> Self {
        Self {
            ids,
            auto_renew_period,
            pending_aliases: Vec::new(),
        }
    }

    pub fn ids(&self) -> &E {
        &self.ids
    }

    /// Aliases linked since the last commit or reclaim.
    pub fn pending_aliases(&self) -> &[Alias] {
        &self.pending_aliases
    }

    /// Create an account for `alias` in the open accounts transaction and
    /// link the two. Numbers already taken by live accounts are skipped.
    pub fn create(
        &mut self,
        alias: &Alias,
        accounts: &mut AccountsLedger,
        aliases: &mut AliasManager,
        tracker: &mut SideEffectsTracker,
        now: i64,
    ) -> Result<AccountId, LedgerError> {
        let mut id = self.ids.new_account_id();
        while accounts.exists(&id) {
            debug!(account = %id, "id source handed out a live account, skipping");
            id = self.ids.new_account_id();
        }
        accounts.create(id)?;
        accounts.set(&id, AccountProperty::Alias, alias.clone())?;
        accounts.set(&id, AccountProperty::Memo, AUTO_MEMO)?;
        accounts.set(&id, AccountProperty::Expiry, now + self.auto_renew_period)?;
        accounts.set(&id, AccountProperty::AutoRenewPeriod, self.auto_renew_period)?;

        aliases.link(alias.clone(), id);
        self.pending_aliases.push(alias.clone());
        tracker.track_auto_creation(alias.clone(), id);

        info!(account = %id, alias = %alias, "account auto-created");
        Ok(id)
    }

    /// Undo the alias links of a failed transaction. Returns `true` if any
    /// creation was pending.
    pub fn reclaim_pending_aliases(&mut self, aliases: &mut AliasManager) -> bool {
        if self.pending_aliases.is_empty() {
            return false;
        }
        for alias in self.pending_aliases.drain(..) {
            aliases.unlink(&alias);
        }
        self.ids.reclaim_provisional_ids();
        debug!("pending auto-creations reclaimed");
        true
    }

    /// Make the creations of a committed transaction permanent.
    pub fn reset(&mut self) {
        self.pending_aliases.clear();
        self.ids.reset_provisional_ids();
    }
}
