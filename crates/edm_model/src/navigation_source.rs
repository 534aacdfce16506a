use std::fmt;
use std::sync::Arc;

use crate::schema_type::SchemaType;

// -----------------------------------------------------------------------------
// NavigationSourceKind

/// An enumeration of the kinds of navigation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationSourceKind {
    /// A named collection of entities.
    EntitySet,

    /// A named single entity.
    Singleton,

    /// The unresolved sentinel: a navigation target the model could not
    /// name. Serialization proceeds, but anything requiring a concrete
    /// container (links, availability checks) treats the source as absent.
    Unknown,
}

impl fmt::Display for NavigationSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntitySet => f.pad("EntitySet"),
            Self::Singleton => f.pad("Singleton"),
            Self::Unknown => f.pad("Unknown"),
        }
    }
}

// -----------------------------------------------------------------------------
// NavigationSource

/// A named collection or singleton in the schema that entity instances
/// belong to.
///
/// A navigation source is only well-defined relative to where the current
/// descent stands in the entity-set graph; resolving the source for a
/// nested write is the job of
/// [`SchemaModel::find_navigation_target`](crate::SchemaModel::find_navigation_target).
///
/// Equality compares kind and name, which is enough to identify a source
/// within one model.
#[derive(Debug, Clone)]
pub struct NavigationSource {
    name: Box<str>,
    entity_type: Option<Arc<SchemaType>>,
    kind: NavigationSourceKind,
}

impl NavigationSource {
    /// Creates an entity set over the given entity type.
    #[inline]
    pub fn entity_set(name: &str, entity_type: Arc<SchemaType>) -> Self {
        Self {
            name: name.into(),
            entity_type: Some(entity_type),
            kind: NavigationSourceKind::EntitySet,
        }
    }

    /// Creates a singleton of the given entity type.
    #[inline]
    pub fn singleton(name: &str, entity_type: Arc<SchemaType>) -> Self {
        Self {
            name: name.into(),
            entity_type: Some(entity_type),
            kind: NavigationSourceKind::Singleton,
        }
    }

    /// Creates the unresolved sentinel for a navigation target the model
    /// could not name.
    #[inline]
    pub fn unknown(name: &str) -> Self {
        Self {
            name: name.into(),
            entity_type: None,
            kind: NavigationSourceKind::Unknown,
        }
    }

    /// Returns the name of the source.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entity type the source holds, absent for the unknown
    /// sentinel.
    #[inline]
    pub const fn entity_type(&self) -> Option<&Arc<SchemaType>> {
        self.entity_type.as_ref()
    }

    /// Returns the kind of the source.
    #[inline(always)]
    pub const fn kind(&self) -> NavigationSourceKind {
        self.kind
    }

    /// Returns `true` for the unresolved sentinel.
    #[inline]
    pub const fn is_unknown(&self) -> bool {
        matches!(self.kind, NavigationSourceKind::Unknown)
    }
}

impl PartialEq for NavigationSource {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.name == other.name
    }
}

impl Eq for NavigationSource {}

impl fmt::Display for NavigationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::NavigationSource;
    use crate::schema_type::SchemaType;

    #[test]
    fn unknown_sentinel_has_no_entity_type() {
        let unknown = NavigationSource::unknown("Customer");
        assert!(unknown.is_unknown());
        assert!(unknown.entity_type().is_none());
    }

    #[test]
    fn equality_by_kind_and_name() {
        let ty = Arc::new(SchemaType::entity("shop", "Customer", Vec::new()));
        let a = NavigationSource::entity_set("Customers", ty.clone());
        let b = NavigationSource::entity_set("Customers", ty);

        assert_eq!(a, b);
        assert_ne!(a, NavigationSource::unknown("Customers"));
    }
}
