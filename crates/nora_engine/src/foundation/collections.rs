//! Specialized collection types

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

pub use slotmap::{DefaultKey, SlotMap};

/// Slot map keyed by the default key type
pub type HandleMap<T> = SlotMap<DefaultKey, T>;

/// Typed handle for type-safe asset references
///
/// Comparison, hashing and copying only look at the key, so `T` can be any
/// marker type.
pub struct TypedHandle<T> {
    key: DefaultKey,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> TypedHandle<T> {
    /// Create a new typed handle from a key
    pub fn new(key: DefaultKey) -> Self {
        Self {
            key,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying key
    pub fn key(&self) -> DefaultKey {
        self.key
    }
}

impl<T> Clone for TypedHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedHandle<T> {}

impl<T> PartialEq for TypedHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for TypedHandle<T> {}

impl<T> Hash for TypedHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T> fmt::Debug for TypedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedHandle").field(&self.key).finish()
    }
}

/// Slot map that hands out [`TypedHandle`]s instead of raw keys
pub struct TypedHandleMap<T> {
    items: HandleMap<T>,
}

impl<T> TypedHandleMap<T> {
    /// Create an empty map
    pub fn new() -> Self {
        Self { items: HandleMap::new() }
    }

    /// Insert an item and return its handle
    pub fn insert(&mut self, item: T) -> TypedHandle<T> {
        TypedHandle::new(self.items.insert(item))
    }

    /// Remove an item; stale handles stop resolving afterwards
    pub fn remove(&mut self, handle: TypedHandle<T>) -> Option<T> {
        self.items.remove(handle.key())
    }

    /// Look up an item
    pub fn get(&self, handle: TypedHandle<T>) -> Option<&T> {
        self.items.get(handle.key())
    }

    /// Iterate over handles and items
    pub fn iter(&self) -> impl Iterator<Item = (TypedHandle<T>, &T)> {
        self.items.iter().map(|(key, item)| (TypedHandle::new(key), item))
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for TypedHandleMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn test_stale_handle_does_not_resolve() {
        let mut map: TypedHandleMap<&'static str> = TypedHandleMap::new();
        let first = map.insert("first");
        assert_eq!(map.remove(first), Some("first"));

        let second = map.insert("second");
        assert_ne!(first, second);
        assert!(map.get(first).is_none());
        assert_eq!(map.get(second), Some(&"second"));
    }

    #[test]
    fn test_handles_copy_without_bounds_on_marker() {
        let mut keys: HandleMap<()> = HandleMap::new();
        let handle: TypedHandle<Marker> = TypedHandle::new(keys.insert(()));
        let copy = handle;
        assert_eq!(handle, copy);
    }
}
