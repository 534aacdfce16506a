use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Errors from deriving a nested serializer context.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeriveError {
    /// Deriving a nested context requires a concrete ancestor resource
    /// instance.
    #[error("cannot derive a nested context from a resource with no concrete instance")]
    MissingExpandedResource,
}

/// Errors from resolving the schema type of an instance.
///
/// Every variant is fatal for the enclosing write operation: the
/// non-fatal resolution steps (restriction and navigation-source
/// fallbacks) never surface here.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    /// Schema-type resolution is impossible without a model.
    #[error("a schema model is required to resolve schema types")]
    MissingModel,

    /// Neither the declared nor the runtime native type has a mapping.
    #[error("no schema type mapping exists for native type `{0}`")]
    UnresolvableNativeType(&'static str),

    /// A value claimed to describe its own schema type but reported none.
    /// This signals a broken value implementation, not recoverable data.
    #[error("value of type `{0}` describes its own schema type but reported none")]
    MissingDescribedType(&'static str),
}

/// Umbrella over every error the serializer core can produce.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SerializeError {
    #[error("context derivation failed: {0}")]
    Derive(#[from] DeriveError),

    #[error("schema type resolution failed: {0}")]
    Resolve(#[from] ResolveError),
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{DeriveError, ResolveError, SerializeError};

    #[test]
    fn umbrella_wraps_both_families() {
        let derive: SerializeError = DeriveError::MissingExpandedResource.into();
        assert!(matches!(derive, SerializeError::Derive(_)));

        let resolve: SerializeError = ResolveError::MissingModel.into();
        assert_eq!(
            resolve.to_string(),
            "schema type resolution failed: a schema model is required to resolve schema types",
        );
    }

    #[test]
    fn unresolvable_names_the_type() {
        let err = ResolveError::UnresolvableNativeType("shop::Order");
        assert!(err.to_string().contains("shop::Order"));
    }
}
