use std::fmt;
use std::sync::Arc;

use edm_model::{NavigationSource, TypeRef};

use crate::context::SerializerContext;
use crate::value::EdmValue;

// -----------------------------------------------------------------------------
// ResourceContext

/// One resource as the writer encounters it: the instance being written,
/// its resolved schema type, and the [`SerializerContext`] in force while
/// writing it.
///
/// The instance is optional, since a null resource inside a payload still
/// occupies a position in the tree, but deriving a *nested* context from
/// it requires a concrete instance (see [`SerializerContext::nested`]).
///
/// The resource's navigation source is the one its context carries.
#[derive(Clone)]
pub struct ResourceContext {
    context: Arc<SerializerContext>,
    schema_type: Option<TypeRef>,
    value: Option<Arc<dyn EdmValue>>,
}

impl ResourceContext {
    /// Creates a resource context over an optional instance.
    #[inline]
    pub fn new(
        context: Arc<SerializerContext>,
        schema_type: Option<TypeRef>,
        value: Option<Arc<dyn EdmValue>>,
    ) -> Self {
        Self {
            context,
            schema_type,
            value,
        }
    }

    /// Creates a resource context over a concrete instance.
    #[inline]
    pub fn with_value(
        context: Arc<SerializerContext>,
        schema_type: Option<TypeRef>,
        value: impl EdmValue,
    ) -> Self {
        Self::new(context, schema_type, Some(Arc::new(value)))
    }

    /// Returns the serializer context in force for this resource.
    #[inline]
    pub const fn serializer_context(&self) -> &Arc<SerializerContext> {
        &self.context
    }

    /// Returns the instance being written, if the resource is concrete.
    #[inline]
    pub const fn value(&self) -> Option<&Arc<dyn EdmValue>> {
        self.value.as_ref()
    }

    /// Returns the resolved schema type of the instance, when known.
    #[inline]
    pub const fn schema_type(&self) -> Option<&TypeRef> {
        self.schema_type.as_ref()
    }

    /// Returns the navigation source this resource belongs to.
    #[inline]
    pub fn navigation_source(&self) -> Option<&Arc<NavigationSource>> {
        self.context.navigation_source()
    }
}

impl fmt::Debug for ResourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceContext")
            .field("schema_type", &self.schema_type)
            .field("concrete", &self.value.is_some())
            .finish()
    }
}
