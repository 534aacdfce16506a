use std::fmt;

use crate::schema_type::TypeRef;

// -----------------------------------------------------------------------------
// PropertyKind

/// The two kinds of declared property.
#[derive(Clone)]
pub enum PropertyKind {
    /// A plain structural property holding a value of the given type.
    Structural { ty: TypeRef },

    /// A navigation property pointing at another entity (or a collection
    /// of them).
    Navigation { target: TypeRef, collection: bool },
}

impl fmt::Debug for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural { ty } => f.debug_struct("Structural").field("ty", ty).finish(),
            Self::Navigation { target, collection } => f
                .debug_struct("Navigation")
                .field("target", target)
                .field("collection", collection)
                .finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Property

/// A declared property of a structured schema type.
///
/// # Examples
///
/// ```
/// use edm_model::{PrimitiveKind, Property, SchemaType, TypeRef};
/// use std::sync::Arc;
///
/// let string = Arc::new(SchemaType::primitive(PrimitiveKind::String));
/// let name = Property::structural("Name", TypeRef::required(string));
///
/// assert_eq!(name.name(), "Name");
/// assert!(!name.is_navigation());
/// ```
#[derive(Clone)]
pub struct Property {
    name: Box<str>,
    kind: PropertyKind,
}

impl Property {
    /// Creates a structural property.
    #[inline]
    pub fn structural(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Structural { ty },
        }
    }

    /// Creates a navigation property targeting `target`.
    ///
    /// `collection` distinguishes a to-many navigation from a to-one.
    #[inline]
    pub fn navigation(name: &str, target: TypeRef, collection: bool) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Navigation { target, collection },
        }
    }

    /// Returns the property name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind of the property.
    #[inline(always)]
    pub const fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    /// Returns `true` if this is a navigation property.
    #[inline]
    pub const fn is_navigation(&self) -> bool {
        matches!(self.kind, PropertyKind::Navigation { .. })
    }

    /// Returns `true` for a to-many navigation property.
    #[inline]
    pub const fn is_collection(&self) -> bool {
        matches!(
            self.kind,
            PropertyKind::Navigation {
                collection: true,
                ..
            }
        )
    }

    /// Returns the type of the property value: the declared type for a
    /// structural property, the target entity type for a navigation
    /// property.
    #[inline]
    pub const fn property_type(&self) -> &TypeRef {
        match &self.kind {
            PropertyKind::Structural { ty } => ty,
            PropertyKind::Navigation { target, .. } => target,
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Property;
    use crate::schema_type::{PrimitiveKind, SchemaType, TypeRef};

    #[test]
    fn property_type_covers_both_kinds() {
        let int32 = Arc::new(SchemaType::primitive(PrimitiveKind::Int32));
        let target = Arc::new(SchemaType::entity("shop", "Order", Vec::new()));

        let amount = Property::structural("Amount", TypeRef::required(int32));
        let orders = Property::navigation("Orders", TypeRef::required(target), true);

        assert_eq!(amount.property_type().qualified_name(), "Edm.Int32");
        assert_eq!(orders.property_type().qualified_name(), "shop.Order");
        assert!(orders.is_navigation());
    }
}
