//! # Ledger Checks
//!
//! A check validates the state an entity would have after the pending
//! changes are applied. It reads through a `PropertyView`, where pending
//! values shadow extant ones, and answers with a `ResponseCode`: a chain of
//! guards where the first failing guard wins.

use shared_types::{AccountId, PropertyValue, ResponseCode};

use crate::domain::property::{ChangeMap, Property};

pub trait LedgerCheck<P: Property> {
    fn check_using(&self, view: &PropertyView<'_, P>) -> ResponseCode;
}

/// Extant properties overlaid with one entity's pending changes.
pub struct PropertyView<'a, P: Property> {
    extant: Option<&'a P::Entity>,
    changes: &'a ChangeMap<P>,
}

impl<'a, P: Property> PropertyView<'a, P> {
    pub fn new(extant: Option<&'a P::Entity>, changes: &'a ChangeMap<P>) -> Self {
        Self { extant, changes }
    }

    pub fn get(&self, property: P) -> PropertyValue {
        if let Some(value) = self.changes.get(&property) {
            return value.clone();
        }
        match self.extant {
            Some(entity) => property.get(entity),
            None => property.get(&P::Entity::default()),
        }
    }

    /// Numeric property, zero if the property is not numeric.
    pub fn get_long(&self, property: P) -> i64 {
        self.get(property).as_long().unwrap_or_default()
    }

    pub fn get_bool(&self, property: P) -> bool {
        self.get(property).as_bool().unwrap_or_default()
    }

    pub fn get_account(&self, property: P) -> AccountId {
        self.get(property).as_account().unwrap_or_default()
    }

    /// The pending changes alone.
    pub fn changes(&self) -> &ChangeMap<P> {
        self.changes
    }

    /// The entity as it stands in the store, `None` for a pending creation.
    pub fn extant(&self) -> Option<&P::Entity> {
        self.extant
    }
}
