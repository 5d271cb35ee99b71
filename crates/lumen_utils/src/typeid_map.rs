use core::any::TypeId;
use core::fmt::Debug;

use crate::hash::NoOpHashState;
use crate::hash::hashbrown::HashMap;
use crate::hash::hashbrown::hash_map::Entry;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map keyed by [`TypeId`].
///
/// `TypeId` is already a hash, so keys are passed through [`NoOpHashState`].
///
/// # Examples
///
/// ```
/// use lumen_utils::TypeIdMap;
///
/// let mut names = TypeIdMap::new();
/// names.insert_type::<u32>("uint32");
///
/// assert_eq!(names.get_type::<u32>(), Some(&"uint32"));
/// assert!(!names.contains_type::<i32>());
/// ```
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    /// Creates an empty `TypeIdMap`.
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    /// Returns the value stored for `type_id`, inserting `f()` first if absent.
    #[inline]
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        match self.0.entry(type_id) {
            Entry::Vacant(entry) => entry.insert(f()),
            Entry::Occupied(entry) => entry.into_mut(),
        }
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    #[inline(always)]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.get(&TypeId::of::<T>())
    }

    /// Inserts a value, returning the previous one.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, v: V) -> Option<V> {
        self.0.insert(type_id, v)
    }

    #[inline(always)]
    pub fn insert_type<T: ?Sized + 'static>(&mut self, v: V) -> Option<V> {
        self.insert(TypeId::of::<T>(), v)
    }

    #[inline]
    pub fn remove(&mut self, type_id: &TypeId) -> Option<V> {
        self.0.remove(type_id)
    }

    /// Keeps only the entries for which `f` returns `true`.
    #[inline]
    pub fn retain(&mut self, mut f: impl FnMut(&TypeId, &mut V) -> bool) {
        self.0.retain(|k, v| f(k, v));
    }

    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains_key(type_id)
    }

    #[inline(always)]
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.contains(&TypeId::of::<T>())
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&TypeId, &V)> {
        self.0.iter()
    }
}

// -----------------------------------------------------------------------------
// Traits

impl<T> Default for TypeIdMap<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for TypeIdMap<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Debug> Debug for TypeIdMap<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeIdMap;
    use core::any::TypeId;

    #[test]
    fn insert_and_retain() {
        let mut map = TypeIdMap::new();
        map.insert_type::<u8>(1);
        map.insert_type::<u16>(2);
        assert_eq!(*map.get_or_insert(TypeId::of::<u32>(), || 3), 3);
        assert_eq!(map.len(), 3);

        map.retain(|_, v| *v != 2);
        assert!(!map.contains_type::<u16>());
        assert_eq!(map.remove(&TypeId::of::<u8>()), Some(1));
        assert_eq!(map.len(), 1);
    }
}
