use core::mem;

use crate::any::{self, AnyArc, TypeInfo};

/// Instances already produced, one per key.
#[derive(Default)]
pub(crate) struct Cache {
    map: any::Map,
}

impl Cache {
    /// Stores `value` unless the key already has an instance and returns the stored one, first write wins.
    #[inline]
    pub(crate) fn insert_first(&mut self, key: TypeInfo, value: AnyArc) -> AnyArc {
        self.map.entry(key).or_insert(value).clone()
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, key: &TypeInfo) -> Option<AnyArc> {
        self.map.get(key).cloned()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, key: &TypeInfo) -> bool {
        self.map.contains_key(key)
    }

    #[inline]
    pub(crate) fn remove(&mut self, key: &TypeInfo) -> Option<AnyArc> {
        self.map.remove(key)
    }

    /// Empties the cache and hands the instances back, so they can be dropped outside of any borrow.
    #[inline]
    #[must_use]
    pub(crate) fn take(&mut self) -> any::Map {
        mem::take(&mut self.map)
    }
}
