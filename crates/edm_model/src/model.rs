use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use fxhash::FxHashMap;

use crate::native::NativeType;
use crate::navigation_source::NavigationSource;
use crate::property::Property;
use crate::schema_type::{PrimitiveKind, SchemaType, TypeRef};

// -----------------------------------------------------------------------------
// SchemaModel

/// The lookup capability the serializer core consumes.
///
/// Every query is an in-memory lookup against an already-loaded model; no
/// call may block. Results must be deterministic for the lifetime of the
/// model: the [`TypeMappingCache`](crate::TypeMappingCache) memoizes them
/// forever and tolerates duplicate computation under races only because
/// repeated queries for the same key agree.
pub trait SchemaModel: Send + Sync {
    /// Returns the schema type a native type maps to, or `None` when the
    /// model declares no mapping.
    fn lookup_schema_type(&self, native: NativeType) -> Option<TypeRef>;

    /// Returns the native type a schema type reference maps to, or `None`
    /// when the model declares no mapping. The reference's nullability is
    /// part of the key: `Edm.Int32` and `Edm.Int32?` may map to different
    /// native types.
    fn lookup_native_type(&self, schema: &TypeRef) -> Option<NativeType>;

    /// Resolves the navigation source reached by following `property` from
    /// `source`.
    ///
    /// Returns `None` for non-navigation properties. For a navigation
    /// property with no declared target the model reports the
    /// [unknown sentinel](NavigationSource::unknown) rather than failing:
    /// target resolution is never a hard error.
    fn find_navigation_target(
        &self,
        source: &NavigationSource,
        property: &Property,
    ) -> Option<Arc<NavigationSource>>;
}

// -----------------------------------------------------------------------------
// EdmModel

/// An in-memory [`SchemaModel`].
///
/// Types are stored by fully-qualified name, navigation sources by name,
/// and navigation property bindings as `(source, property) -> target`
/// entries, mirroring how a schema document declares them.
///
/// # Examples
///
/// ```
/// use edm_model::{EdmModel, NativeType, SchemaModel, SchemaType, TypeRef};
///
/// let mut model = EdmModel::new();
///
/// let customer = model.register_type(SchemaType::entity("shop", "Customer", Vec::new()));
/// struct Customer;
/// model.map_native::<Customer>(TypeRef::required(customer));
///
/// let resolved = model.lookup_schema_type(NativeType::of::<Customer>()).unwrap();
/// assert_eq!(resolved.qualified_name(), "shop.Customer");
/// ```
pub struct EdmModel {
    types: FxHashMap<Box<str>, Arc<SchemaType>>,
    native_to_schema: FxHashMap<NativeType, TypeRef>,
    schema_to_native: FxHashMap<TypeRef, NativeType>,
    navigation_sources: FxHashMap<Box<str>, Arc<NavigationSource>>,
    bindings: FxHashMap<Box<str>, FxHashMap<Box<str>, Box<str>>>,
}

macro_rules! map_default_primitives {
    ($model:ident, $( $ty:ty => $kind:ident ),* $(,)?) => {$(
        let schema = $model.register_type(SchemaType::primitive(PrimitiveKind::$kind));
        $model.map_native::<$ty>(TypeRef::required(schema.clone()));
        $model.map_native::<Option<$ty>>(TypeRef::nullable(schema));
    )*};
}

impl EdmModel {
    /// Creates a model with no registrations at all.
    #[inline]
    pub fn empty() -> Self {
        Self {
            types: FxHashMap::default(),
            native_to_schema: FxHashMap::default(),
            schema_to_native: FxHashMap::default(),
            navigation_sources: FxHashMap::default(),
            bindings: FxHashMap::default(),
        }
    }

    /// Creates a model with the built-in primitive types registered and
    /// the default native mappings in place.
    ///
    /// Mapped out of the box: `bool`, `i32`, `i64`, `f64`, `String` and
    /// chrono datetimes, each together with its `Option<T>` form as the
    /// nullable variant of the same primitive. `Decimal` and `Guid` are
    /// registered as schema types but carry no default native mapping.
    pub fn new() -> Self {
        let mut model = Self::empty();

        for kind in PrimitiveKind::ALL {
            model.register_type(SchemaType::primitive(kind));
        }

        map_default_primitives! { model,
            bool => Boolean,
            i32 => Int32,
            i64 => Int64,
            f64 => Double,
            String => String,
            DateTime<Utc> => DateTimeOffset,
            DateTime<FixedOffset> => DateTimeOffset,
        }

        model
    }

    /// Registers a schema type, keyed by its fully-qualified name.
    ///
    /// If a type with the same qualified name already exists the existing
    /// registration is kept and returned.
    pub fn register_type(&mut self, ty: SchemaType) -> Arc<SchemaType> {
        let key: Box<str> = ty.qualified_name().into();
        self.types
            .entry(key)
            .or_insert_with(|| Arc::new(ty))
            .clone()
    }

    /// Returns the registered type with the given fully-qualified name.
    #[inline]
    pub fn find_type(&self, qualified_name: &str) -> Option<&Arc<SchemaType>> {
        self.types.get(qualified_name)
    }

    /// Returns the built-in primitive type of the given kind, if
    /// registered.
    pub fn primitive_type(&self, kind: PrimitiveKind) -> Option<&Arc<SchemaType>> {
        self.find_type(&format!("Edm.{}", kind.name()))
    }

    /// Declares the mapping between the native type `T` and a schema type
    /// reference, in both directions.
    pub fn map_native<T: 'static>(&mut self, ty: TypeRef) {
        let native = NativeType::of::<T>();
        self.schema_to_native.insert(ty.clone(), native);
        self.native_to_schema.insert(native, ty);
    }

    /// Registers an entity set over `entity_type`.
    pub fn add_entity_set(
        &mut self,
        name: &str,
        entity_type: Arc<SchemaType>,
    ) -> Arc<NavigationSource> {
        let source = Arc::new(NavigationSource::entity_set(name, entity_type));
        self.navigation_sources
            .entry(name.into())
            .or_insert(source)
            .clone()
    }

    /// Registers a singleton of `entity_type`.
    pub fn add_singleton(
        &mut self,
        name: &str,
        entity_type: Arc<SchemaType>,
    ) -> Arc<NavigationSource> {
        let source = Arc::new(NavigationSource::singleton(name, entity_type));
        self.navigation_sources
            .entry(name.into())
            .or_insert(source)
            .clone()
    }

    /// Returns the navigation source with the given name.
    #[inline]
    pub fn navigation_source(&self, name: &str) -> Option<&Arc<NavigationSource>> {
        self.navigation_sources.get(name)
    }

    /// Declares that following navigation property `property` from
    /// `source` lands in `target`.
    pub fn bind_navigation(&mut self, source: &str, property: &str, target: &str) {
        self.bindings
            .entry(source.into())
            .or_default()
            .insert(property.into(), target.into());
    }
}

impl Default for EdmModel {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaModel for EdmModel {
    fn lookup_schema_type(&self, native: NativeType) -> Option<TypeRef> {
        self.native_to_schema.get(&native).cloned()
    }

    fn lookup_native_type(&self, schema: &TypeRef) -> Option<NativeType> {
        self.schema_to_native.get(schema).copied()
    }

    fn find_navigation_target(
        &self,
        source: &NavigationSource,
        property: &Property,
    ) -> Option<Arc<NavigationSource>> {
        if !property.is_navigation() {
            return None;
        }

        // Following anything out of an already-unknown source stays
        // unknown.
        if !source.is_unknown() {
            if let Some(target) = self
                .bindings
                .get(source.name())
                .and_then(|targets| targets.get(property.name()))
                .and_then(|name| self.navigation_sources.get(&**name))
            {
                return Some(target.clone());
            }
        }

        Some(Arc::new(NavigationSource::unknown(property.name())))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{EdmModel, SchemaModel};
    use crate::native::NativeType;
    use crate::navigation_source::NavigationSource;
    use crate::property::Property;
    use crate::schema_type::{PrimitiveKind, SchemaType, TypeRef};

    fn sample_model() -> EdmModel {
        let mut model = EdmModel::new();

        let customer = model.register_type(SchemaType::entity("shop", "Customer", Vec::new()));
        let order = model.register_type(SchemaType::entity(
            "shop",
            "Order",
            vec![Property::navigation(
                "Customer",
                TypeRef::required(customer.clone()),
                false,
            )],
        ));

        model.add_entity_set("Customers", customer);
        model.add_entity_set("Orders", order);
        model.bind_navigation("Orders", "Customer", "Customers");

        model
    }

    #[test]
    fn default_primitives_are_mapped() {
        let model = EdmModel::new();

        let int32 = model.lookup_schema_type(NativeType::of::<i32>()).unwrap();
        assert_eq!(int32.qualified_name(), "Edm.Int32");
        assert!(!int32.is_nullable());

        let opt = model
            .lookup_schema_type(NativeType::of::<Option<i32>>())
            .unwrap();
        assert!(opt.is_nullable());

        assert!(model.primitive_type(PrimitiveKind::Guid).is_some());
        assert!(
            model
                .lookup_schema_type(NativeType::of::<u128>())
                .is_none()
        );
    }

    #[test]
    fn bound_navigation_resolves_to_target() {
        let model = sample_model();
        let orders = model.navigation_source("Orders").unwrap().clone();
        let order_type = model.find_type("shop.Order").unwrap().clone();
        let customer_prop = order_type.find_property("Customer").unwrap().clone();

        let target = model
            .find_navigation_target(&orders, &customer_prop)
            .unwrap();
        assert_eq!(target.name(), "Customers");
        assert!(!target.is_unknown());
    }

    #[test]
    fn singletons_are_navigation_sources_too() {
        let mut model = sample_model();
        let company = model.register_type(SchemaType::entity("shop", "Company", Vec::new()));
        let me = model.add_singleton("Company", company);

        assert!(!me.is_unknown());
        assert_eq!(
            model.navigation_source("Company").map(|s| s.name()),
            Some("Company")
        );
    }

    #[test]
    fn unbound_navigation_falls_back_to_unknown() {
        let mut model = sample_model();
        let employee = model.register_type(SchemaType::entity("shop", "Employee", Vec::new()));
        let managed_by = Property::navigation("ManagedBy", TypeRef::required(employee), false);

        let orders = model.navigation_source("Orders").unwrap().clone();
        let target = model.find_navigation_target(&orders, &managed_by).unwrap();
        assert!(target.is_unknown());

        // Unknown stays unknown, and structural properties have no target.
        let from_unknown = NavigationSource::unknown("ManagedBy");
        assert!(
            model
                .find_navigation_target(&from_unknown, &managed_by)
                .unwrap()
                .is_unknown()
        );

        let structural = Property::structural(
            "Total",
            TypeRef::required(model.primitive_type(PrimitiveKind::Double).unwrap().clone()),
        );
        assert!(model.find_navigation_target(&orders, &structural).is_none());
    }
}
