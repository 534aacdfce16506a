use dashmap::DashMap;
use fxhash::FxBuildHasher;

use crate::model::SchemaModel;
use crate::native::NativeType;
use crate::schema_type::TypeRef;

// -----------------------------------------------------------------------------
// TypeMappingCache

/// Memoizes native ↔ schema type lookups against a [`SchemaModel`].
///
/// The cache is meant to be shared process-wide across concurrent
/// serialization passes, one instance per model. Entries are never
/// evicted; the cache lives exactly as long as the model does.
///
/// Both directions cache absence too: a `None` from the model is stored as
/// a `None` entry, so a type with no mapping costs one model query for the
/// whole process lifetime, not one per serialization.
///
/// # Concurrency
///
/// Lookups take no lock across the model query. Two threads racing on the
/// first access of the same key may both query the model; whichever write
/// lands last wins, which is correct because results are a pure function
/// of (key, model). There is no cross-key or global locking.
///
/// # Examples
///
/// ```
/// use edm_model::{EdmModel, NativeType, TypeMappingCache};
///
/// let model = EdmModel::new();
/// let cache = TypeMappingCache::new();
///
/// let int32 = cache
///     .resolve_schema_type(NativeType::of::<i32>(), &model)
///     .unwrap();
/// assert_eq!(int32.qualified_name(), "Edm.Int32");
///
/// // Round trip through the reverse table.
/// let native = cache.resolve_native_type(&int32, &model).unwrap();
/// assert_eq!(native, NativeType::of::<i32>());
/// ```
pub struct TypeMappingCache {
    native_to_schema: DashMap<NativeType, Option<TypeRef>, FxBuildHasher>,
    schema_to_native: DashMap<TypeRef, Option<NativeType>, FxBuildHasher>,
}

impl TypeMappingCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            native_to_schema: DashMap::with_hasher(FxBuildHasher::default()),
            schema_to_native: DashMap::with_hasher(FxBuildHasher::default()),
        }
    }

    /// Resolves the schema type for a native type, memoized.
    ///
    /// On a miss the model is queried once and the result (including a
    /// "no mapping exists" `None`) is stored. Never fails: absence is an
    /// ordinary result.
    pub fn resolve_schema_type(
        &self,
        native: NativeType,
        model: &dyn SchemaModel,
    ) -> Option<TypeRef> {
        if let Some(hit) = self.native_to_schema.get(&native) {
            return hit.value().clone();
        }

        // Computed outside any table lock; a racing writer for the same
        // key stores an identical result.
        let resolved = model.lookup_schema_type(native);
        self.native_to_schema.insert(native, resolved.clone());
        resolved
    }

    /// Resolves the native type for a schema type reference, memoized.
    ///
    /// The key is the reference's structural identity: the same schema
    /// type node with a different nullability is a different entry.
    pub fn resolve_native_type(
        &self,
        schema: &TypeRef,
        model: &dyn SchemaModel,
    ) -> Option<NativeType> {
        if let Some(hit) = self.schema_to_native.get(schema) {
            return *hit.value();
        }

        let resolved = model.lookup_native_type(schema);
        self.schema_to_native.insert(schema.clone(), resolved);
        resolved
    }
}

impl Default for TypeMappingCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::TypeMappingCache;
    use crate::model::{EdmModel, SchemaModel};
    use crate::native::NativeType;
    use crate::navigation_source::NavigationSource;
    use crate::property::Property;
    use crate::schema_type::{PrimitiveKind, SchemaType, TypeRef};

    struct CountingModel {
        inner: EdmModel,
        forward_lookups: AtomicUsize,
        reverse_lookups: AtomicUsize,
    }

    impl CountingModel {
        fn new() -> Self {
            Self {
                inner: EdmModel::new(),
                forward_lookups: AtomicUsize::new(0),
                reverse_lookups: AtomicUsize::new(0),
            }
        }
    }

    impl SchemaModel for CountingModel {
        fn lookup_schema_type(&self, native: NativeType) -> Option<TypeRef> {
            self.forward_lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.lookup_schema_type(native)
        }

        fn lookup_native_type(&self, schema: &TypeRef) -> Option<NativeType> {
            self.reverse_lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.lookup_native_type(schema)
        }

        fn find_navigation_target(
            &self,
            source: &NavigationSource,
            property: &Property,
        ) -> Option<Arc<NavigationSource>> {
            self.inner.find_navigation_target(source, property)
        }
    }

    #[test]
    fn repeated_lookups_hit_the_cache() {
        let model = CountingModel::new();
        let cache = TypeMappingCache::new();
        let native = NativeType::of::<i64>();

        let first = cache.resolve_schema_type(native, &model);
        let second = cache.resolve_schema_type(native, &model);

        assert_eq!(first, second);
        assert_eq!(model.forward_lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn absence_is_cached_too() {
        struct Unmapped;

        let model = CountingModel::new();
        let cache = TypeMappingCache::new();
        let native = NativeType::of::<Unmapped>();

        assert!(cache.resolve_schema_type(native, &model).is_none());
        assert!(cache.resolve_schema_type(native, &model).is_none());
        assert_eq!(model.forward_lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_first_access_is_consistent() {
        let model = EdmModel::new();
        let cache = TypeMappingCache::new();
        let expected = model.lookup_schema_type(NativeType::of::<i32>());

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| cache.resolve_schema_type(NativeType::of::<i32>(), &model))
                })
                .collect();

            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn nullability_distinguishes_reverse_entries() {
        let model = CountingModel::new();
        let cache = TypeMappingCache::new();
        let int32 = model.inner.primitive_type(PrimitiveKind::Int32).unwrap();

        let required = cache.resolve_native_type(&TypeRef::required(int32.clone()), &model);
        let nullable = cache.resolve_native_type(&TypeRef::nullable(int32.clone()), &model);

        assert_eq!(required, Some(NativeType::of::<i32>()));
        assert_eq!(nullable, Some(NativeType::of::<Option<i32>>()));
        assert_eq!(model.reverse_lookups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn reverse_entry_survives_distinct_allocations_of_the_node() {
        let model = CountingModel::new();
        let cache = TypeMappingCache::new();

        // Two logically-identical references from different allocations
        // must land on the same cache slot.
        let a = TypeRef::required(Arc::new(SchemaType::primitive(PrimitiveKind::String)));
        let b = TypeRef::required(Arc::new(SchemaType::primitive(PrimitiveKind::String)));

        let first = cache.resolve_native_type(&a, &model);
        let second = cache.resolve_native_type(&b, &model);

        assert_eq!(first, second);
        assert_eq!(model.reverse_lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bidirectional_consistency_for_bijective_mappings() {
        let model = EdmModel::new();
        let cache = TypeMappingCache::new();

        let schema = cache
            .resolve_schema_type(NativeType::of::<String>(), &model)
            .unwrap();
        let native = cache.resolve_native_type(&schema, &model).unwrap();

        assert_eq!(native, NativeType::of::<String>());
        assert_eq!(
            cache.resolve_schema_type(native, &model),
            Some(schema)
        );
    }
}
