//! Alias to account number links.

use std::collections::HashMap;

use shared_types::{Account, AccountId, Alias};

#[derive(Debug, Default, Clone)]
pub struct AliasManager {
    aliases: HashMap<Alias, AccountId>,
}

impl AliasManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links for every account in `accounts` that carries an alias.
    pub fn rebuild<'a>(accounts: impl IntoIterator<Item = (&'a AccountId, &'a Account)>) -> Self {
        let mut manager = Self::new();
        for (id, account) in accounts {
            if !account.alias.is_empty() {
                manager.link(account.alias.clone(), *id);
            }
        }
        manager
    }

    pub fn link(&mut self, alias: Alias, id: AccountId) {
        self.aliases.insert(alias, id);
    }

    pub fn unlink(&mut self, alias: &Alias) -> Option<AccountId> {
        self.aliases.remove(alias)
    }

    /// The linked account, `None` if the alias is unknown.
    pub fn lookup(&self, alias: &Alias) -> Option<AccountId> {
        self.aliases.get(alias).copied()
    }

    pub fn contains(&self, alias: &Alias) -> bool {
        self.aliases.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
