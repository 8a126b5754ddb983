//! # Entity Change Set
//!
//! The ordered record of one transaction's pending work. Each slot holds an
//! id, the entity cached for it (if any) and either a change map (an update
//! or creation) or `None` (a removal). Slot order is first-touch order, which
//! is also the order in which a commit writes to the backing store.

use std::fmt;
use std::sync::Arc;

use crate::domain::property::{ChangeMap, Property};

#[derive(Debug, Clone)]
pub struct ChangeEntry<K, P: Property> {
    pub id: K,
    /// Pre-image for updates and removals; `None` for a creation until the
    /// commit caches the persisted entity.
    pub entity: Option<Arc<P::Entity>>,
    /// `None` marks a removal.
    pub changes: Option<ChangeMap<P>>,
}

impl<K, P: Property> ChangeEntry<K, P> {
    pub fn is_removal(&self) -> bool {
        self.changes.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct EntityChangeSet<K, P: Property> {
    entries: Vec<ChangeEntry<K, P>>,
    retained: usize,
}

impl<K, P: Property> Default for EntityChangeSet<K, P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            retained: 0,
        }
    }
}

impl<K, P: Property> EntityChangeSet<K, P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an update slot.
    pub fn include(&mut self, id: K, entity: Option<Arc<P::Entity>>, changes: ChangeMap<P>) {
        self.entries.push(ChangeEntry {
            id,
            entity,
            changes: Some(changes),
        });
        self.retained += 1;
    }

    /// Append a removal slot, keeping the pre-image for interceptors.
    pub fn include_removal(&mut self, id: K, entity: Option<Arc<P::Entity>>) {
        self.entries.push(ChangeEntry {
            id,
            entity,
            changes: None,
        });
    }

    /// Fill in the cached entity of slot `index`.
    pub fn cache_entity(&mut self, index: usize, entity: Arc<P::Entity>) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.entity = Some(entity);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.retained = 0;
    }

    /// All slots, removals included.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Slots that will be persisted.
    pub fn retained_size(&self) -> usize {
        self.retained
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn id(&self, index: usize) -> &K {
        &self.entries[index].id
    }

    pub fn entity(&self, index: usize) -> Option<&Arc<P::Entity>> {
        self.entries[index].entity.as_ref()
    }

    pub fn changes(&self, index: usize) -> Option<&ChangeMap<P>> {
        self.entries[index].changes.as_ref()
    }

    pub fn entry(&self, index: usize) -> &ChangeEntry<K, P> {
        &self.entries[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeEntry<K, P>> {
        self.entries.iter()
    }
}

impl<K: fmt::Display, P: Property> fmt::Display for EntityChangeSet<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match &entry.changes {
                None => write!(f, "*DEAD* {}", entry.id)?,
                Some(changes) => {
                    write!(f, "{} -> {{", entry.id)?;
                    for (j, (property, value)) in changes.iter().enumerate() {
                        if j > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}: {}", property, value)?;
                    }
                    write!(f, "}}")?;
                }
            }
        }
        Ok(())
    }
}
