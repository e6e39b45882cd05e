use slotmap::{Key, SlotMap};

use super::AssetError;

/// Generation-checked storage shared by the managers.
///
/// A removed slot bumps its generation, so an id held past `remove` fails
/// lookup with [`AssetError::NotFound`] instead of reaching a newer asset.
#[derive(Debug)]
pub(crate) struct Store<K: Key, T> {
    kind: &'static str,
    items: SlotMap<K, T>,
}

impl<K: Key, T> Store<K, T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            items: SlotMap::with_key(),
        }
    }

    pub fn insert(&mut self, item: T) -> K {
        self.items.insert(item)
    }

    pub fn get(&self, id: K) -> Result<&T, AssetError> {
        self.items.get(id).ok_or(AssetError::NotFound { kind: self.kind })
    }

    pub fn get_mut(&mut self, id: K) -> Result<&mut T, AssetError> {
        let kind = self.kind;
        self.items.get_mut(id).ok_or(AssetError::NotFound { kind })
    }

    pub fn remove(&mut self, id: K) -> Result<T, AssetError> {
        self.items.remove(id).ok_or(AssetError::NotFound { kind: self.kind })
    }

    pub fn contains(&self, id: K) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Removes every item, yielding them for release.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.items.drain().map(|(_, item)| item)
    }
}
