use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use fxhash::FxHashMap;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

// -----------------------------------------------------------------------------
// ContextItems

type AnyMap = FxHashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// The extensibility bag of a serializer context tree.
///
/// Entries are keyed by their type, one value per type. The bag is shared
/// *by reference* across the whole tree rooted at a request: cloning a
/// `ContextItems` (which every context derivation does) hands out another
/// handle to the same underlying map, so children see and can add to the
/// same entries as their ancestors.
///
/// Insertion is safe under concurrent callers, though the core's own
/// traversal is single-threaded and never requires it.
///
/// # Examples
///
/// ```
/// use edm_ser::ContextItems;
///
/// struct Correlation(u64);
///
/// let items = ContextItems::new();
/// let shared = items.clone();
///
/// items.insert(Correlation(7));
/// assert_eq!(shared.get::<Correlation>().unwrap().0, 7);
/// ```
#[derive(Clone, Default)]
pub struct ContextItems {
    inner: Arc<RwLock<AnyMap>>,
}

impl ContextItems {
    /// Creates an empty bag. Allocation of the map itself is deferred
    /// until the first insertion.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value of the same type if
    /// one was present.
    pub fn insert<T: Any + Send + Sync>(&self, value: T) -> Option<T> {
        self.inner
            .write()
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|prev| prev.downcast::<T>().ok())
            .map(|prev| *prev)
    }

    /// Returns a read guard over the value of type `T`, if present.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<MappedRwLockReadGuard<'_, T>> {
        RwLockReadGuard::try_map(self.inner.read(), |map| {
            map.get(&TypeId::of::<T>())
                .and_then(|value| value.downcast_ref::<T>())
        })
        .ok()
    }

    /// Removes and returns the value of type `T`, if present.
    pub fn remove<T: Any + Send + Sync>(&self) -> Option<T> {
        self.inner
            .write()
            .remove(&TypeId::of::<T>())
            .and_then(|prev| prev.downcast::<T>().ok())
            .map(|prev| *prev)
    }

    /// Returns `true` if a value of type `T` is present.
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.inner.read().contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the bag holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns `true` if both handles point at the same underlying bag.
    #[inline]
    pub fn is_shared_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ContextItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextItems")
            .field("len", &self.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::ContextItems;

    #[derive(Debug, PartialEq)]
    struct Marker(&'static str);

    #[test]
    fn clones_share_the_same_bag() {
        let items = ContextItems::new();
        let child = items.clone();

        assert!(items.is_shared_with(&child));
        child.insert(Marker("from-child"));

        assert_eq!(*items.get::<Marker>().unwrap(), Marker("from-child"));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn one_slot_per_type() {
        let items = ContextItems::new();

        assert!(items.insert(Marker("first")).is_none());
        assert_eq!(items.insert(Marker("second")), Some(Marker("first")));
        assert_eq!(items.remove::<Marker>(), Some(Marker("second")));
        assert!(items.is_empty());
    }

    #[test]
    fn concurrent_insertion_is_safe() {
        let items = ContextItems::new();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let handle = items.clone();
                scope.spawn(move || {
                    handle.insert(Marker("raced"));
                });
            }
        });

        assert!(items.contains::<Marker>());
    }
}
