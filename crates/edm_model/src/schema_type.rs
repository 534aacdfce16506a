use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::property::Property;

// -----------------------------------------------------------------------------
// PrimitiveKind

/// The built-in primitive schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Int32,
    Int64,
    Double,
    Decimal,
    String,
    Guid,
    DateTimeOffset,
}

impl PrimitiveKind {
    /// Every primitive kind, in declaration order.
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Double,
        PrimitiveKind::Decimal,
        PrimitiveKind::String,
        PrimitiveKind::Guid,
        PrimitiveKind::DateTimeOffset,
    ];

    /// Returns the unqualified schema name of the kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::String => "String",
            Self::Guid => "Guid",
            Self::DateTimeOffset => "DateTimeOffset",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// -----------------------------------------------------------------------------
// SchemaTypeKind

/// An enumeration of the kinds of schema type node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaTypeKind {
    Primitive(PrimitiveKind),
    Complex,
    Entity,
}

impl fmt::Display for SchemaTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(_) => f.pad("Primitive"),
            Self::Complex => f.pad("Complex"),
            Self::Entity => f.pad("Entity"),
        }
    }
}

// -----------------------------------------------------------------------------
// SchemaType

/// A named node of the schema model.
///
/// A `SchemaType` is identified across the model by its fully-qualified
/// name (`namespace.Name`), precomputed at construction so cache keys can
/// hash it without allocating.
///
/// Structured kinds (entity and complex) declare [`Property`] entries;
/// primitives declare none.
///
/// # Examples
///
/// ```
/// use edm_model::{Property, SchemaType, TypeRef, PrimitiveKind};
/// use std::sync::Arc;
///
/// let string = Arc::new(SchemaType::primitive(PrimitiveKind::String));
/// let customer = SchemaType::entity(
///     "sample",
///     "Customer",
///     vec![Property::structural("Name", TypeRef::required(string))],
/// );
///
/// assert_eq!(customer.qualified_name(), "sample.Customer");
/// assert!(customer.find_property("Name").is_some());
/// ```
pub struct SchemaType {
    namespace: Box<str>,
    name: Box<str>,
    qualified: Box<str>,
    kind: SchemaTypeKind,
    properties: Vec<Arc<Property>>,
}

impl SchemaType {
    fn new(namespace: &str, name: &str, kind: SchemaTypeKind, properties: Vec<Property>) -> Self {
        let mut qualified = String::with_capacity(namespace.len() + name.len() + 1);
        qualified.push_str(namespace);
        qualified.push('.');
        qualified.push_str(name);

        Self {
            namespace: namespace.into(),
            name: name.into(),
            qualified: qualified.into(),
            kind,
            properties: properties.into_iter().map(Arc::new).collect(),
        }
    }

    /// Creates the built-in primitive type of the given kind, in the `Edm`
    /// namespace.
    #[inline]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new("Edm", kind.name(), SchemaTypeKind::Primitive(kind), Vec::new())
    }

    /// Creates a complex (structured, keyless) type.
    #[inline]
    pub fn complex(namespace: &str, name: &str, properties: Vec<Property>) -> Self {
        Self::new(namespace, name, SchemaTypeKind::Complex, properties)
    }

    /// Creates an entity type.
    #[inline]
    pub fn entity(namespace: &str, name: &str, properties: Vec<Property>) -> Self {
        Self::new(namespace, name, SchemaTypeKind::Entity, properties)
    }

    /// Returns the namespace of the type.
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the unqualified name of the type.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fully-qualified `namespace.Name`.
    #[inline]
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    /// Returns the kind of the type.
    #[inline(always)]
    pub const fn kind(&self) -> SchemaTypeKind {
        self.kind
    }

    /// Returns the declared properties, empty for primitives.
    #[inline]
    pub fn properties(&self) -> &[Arc<Property>] {
        &self.properties
    }

    /// Finds a declared property by name.
    pub fn find_property(&self, name: &str) -> Option<&Arc<Property>> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Returns `true` for entity types.
    #[inline]
    pub const fn is_entity(&self) -> bool {
        matches!(self.kind, SchemaTypeKind::Entity)
    }

    /// Returns `true` for entity and complex types.
    #[inline]
    pub const fn is_structured(&self) -> bool {
        matches!(self.kind, SchemaTypeKind::Entity | SchemaTypeKind::Complex)
    }

    /// Returns `true` for primitive types.
    #[inline]
    pub const fn is_primitive(&self) -> bool {
        matches!(self.kind, SchemaTypeKind::Primitive(_))
    }
}

// Shallow by intent: properties may refer back to this type.
impl fmt::Debug for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaType")
            .field("qualified", &self.qualified)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.qualified)
    }
}

// -----------------------------------------------------------------------------
// TypeRef

/// A reference to a [`SchemaType`] node together with a nullability flag.
///
/// Two `TypeRef`s are equivalent iff they denote the same schema type node
/// **and** the same nullability. Equality and hashing are structural over
/// the fully-qualified name plus the flag, so logically-identical
/// references compare equal across repeated model lookups even when they
/// are distinct allocations.
///
/// # Examples
///
/// ```
/// use edm_model::{PrimitiveKind, SchemaType, TypeRef};
/// use std::sync::Arc;
///
/// let int32 = Arc::new(SchemaType::primitive(PrimitiveKind::Int32));
///
/// assert_eq!(TypeRef::required(int32.clone()), TypeRef::required(int32.clone()));
/// assert_ne!(TypeRef::required(int32.clone()), TypeRef::nullable(int32));
/// ```
#[derive(Clone)]
pub struct TypeRef {
    definition: Arc<SchemaType>,
    nullable: bool,
}

impl TypeRef {
    /// Creates a reference with an explicit nullability flag.
    #[inline]
    pub const fn new(definition: Arc<SchemaType>, nullable: bool) -> Self {
        Self {
            definition,
            nullable,
        }
    }

    /// Creates a non-nullable reference.
    #[inline]
    pub const fn required(definition: Arc<SchemaType>) -> Self {
        Self::new(definition, false)
    }

    /// Creates a nullable reference.
    #[inline]
    pub const fn nullable(definition: Arc<SchemaType>) -> Self {
        Self::new(definition, true)
    }

    /// Returns the referenced schema type node.
    #[inline]
    pub const fn definition(&self) -> &Arc<SchemaType> {
        &self.definition
    }

    /// Returns whether the reference permits null.
    #[inline(always)]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the fully-qualified name of the referenced type.
    #[inline]
    pub fn qualified_name(&self) -> &str {
        self.definition.qualified_name()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.nullable == other.nullable && self.qualified_name() == other.qualified_name()
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.qualified_name().hash(state);
        self.nullable.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
            .field("qualified", &self.qualified_name())
            .field("nullable", &self.nullable)
            .finish()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.qualified_name())
        } else {
            f.pad(self.qualified_name())
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{PrimitiveKind, SchemaType, TypeRef};

    #[test]
    fn qualified_name_is_precomputed() {
        let ty = SchemaType::complex("shop", "Address", Vec::new());
        assert_eq!(ty.qualified_name(), "shop.Address");
        assert_eq!(ty.namespace(), "shop");
        assert_eq!(ty.name(), "Address");
    }

    #[test]
    fn type_ref_equality_is_structural() {
        // Two separate allocations of the same logical node.
        let a = Arc::new(SchemaType::primitive(PrimitiveKind::String));
        let b = Arc::new(SchemaType::primitive(PrimitiveKind::String));

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(TypeRef::required(a), TypeRef::required(b));
    }

    #[test]
    fn nullability_participates_in_identity() {
        let ty = Arc::new(SchemaType::primitive(PrimitiveKind::Int64));
        assert_ne!(TypeRef::required(ty.clone()), TypeRef::nullable(ty));
    }
}
