//! # Change Summaries
//!
//! Pure functions over a per-entity change map: recording a mutation, and
//! materializing the speculative ("finalized") entity a commit would write.
//!
//! Finalizing never touches the store's copy. When nothing changed the
//! cached `Arc` itself is returned, so callers can observe identity with
//! `Arc::ptr_eq`; otherwise the extant entity is cloned before the changes
//! are applied.

use std::sync::Arc;

use shared_types::PropertyValue;

use crate::domain::property::{ChangeMap, Property};
use crate::ports::BackingStore;

/// Record `property = value`, overwriting any earlier pending value.
pub fn update<P: Property>(changes: &mut ChangeMap<P>, property: P, value: PropertyValue) {
    changes.insert(property, value);
}

/// Apply every pending change to `entity`.
pub fn merge_into<P: Property>(entity: &mut P::Entity, changes: &ChangeMap<P>) {
    for (property, value) in changes {
        property.set(entity, value.clone());
    }
}

/// The entity `id` would hold if `changes` were committed now.
///
/// The extant value comes from `cached` if present, else from `store`, else
/// is default-constructed (a pending creation).
pub fn finalized<K, P, S>(
    id: &K,
    cached: Option<&Arc<P::Entity>>,
    changes: &ChangeMap<P>,
    store: &S,
) -> Arc<P::Entity>
where
    P: Property,
    S: BackingStore<K, P::Entity>,
{
    let extant = cached.cloned().or_else(|| store.get(id));
    match extant {
        Some(entity) if changes.is_empty() => entity,
        Some(entity) => {
            let mut copy = (*entity).clone();
            merge_into::<P>(&mut copy, changes);
            Arc::new(copy)
        }
        None => {
            let mut fresh = P::Entity::default();
            merge_into::<P>(&mut fresh, changes);
            Arc::new(fresh)
        }
    }
}
