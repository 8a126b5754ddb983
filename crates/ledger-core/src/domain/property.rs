//! # Entity Properties
//!
//! A property is one typed field of an entity, addressed by an enum variant.
//! Pending mutations are expressed only at property granularity: a change map
//! holds at most one value per property, and finalizing an entity applies
//! every entry through `Property::set`.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use shared_types::{PropertyValue, ResponseCode};

/// Sparse per-entity diff, iterated in property declaration order.
pub type ChangeMap<P> = BTreeMap<P, PropertyValue>;

pub trait Property: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + 'static {
    /// The entity kind these properties read and write.
    type Entity: Clone + Default + fmt::Debug;

    /// Every property, in declaration order.
    const ALL: &'static [Self];

    /// Code `validate` returns when the id resolves to nothing.
    const MISSING_ENTITY: ResponseCode;

    fn get(self, entity: &Self::Entity) -> PropertyValue;

    /// Writes `value` into `entity`. Values of the wrong shape are ignored;
    /// the ledger refuses them before they reach a change map.
    fn set(self, entity: &mut Self::Entity, value: PropertyValue);

    /// Whether `value` has the shape this property stores.
    fn accepts(self, value: &PropertyValue) -> bool;
}

/// A change map that would turn a default entity into `entity`.
pub fn full_changes<P: Property>(entity: &P::Entity) -> ChangeMap<P> {
    P::ALL.iter().map(|p| (*p, p.get(entity))).collect()
}
