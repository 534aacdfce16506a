use std::any::Any;

use chrono::{DateTime, FixedOffset, Utc};
use edm_model::{NativeType, TypeRef};

// -----------------------------------------------------------------------------
// SchemaTyped

/// The self-describing capability: a value that knows its own schema type
/// without consulting the model.
///
/// A value advertising this capability **must** report a type. Returning
/// `None` from [`schema_type`](Self::schema_type) is a broken
/// implementation and surfaces as
/// [`ResolveError::MissingDescribedType`](crate::ResolveError::MissingDescribedType)
/// during resolution.
pub trait SchemaTyped {
    /// Returns the schema type this value conforms to.
    fn schema_type(&self) -> Option<TypeRef>;
}

// -----------------------------------------------------------------------------
// EdmValue

/// An instance the serializer can descend into.
///
/// The trait exposes exactly what runtime schema-type resolution needs:
/// the value's *actual* native type (which may be more derived than the
/// declared one the writer knows), and the optional [`SchemaTyped`]
/// capability as an explicit accessor rather than a downcast test.
///
/// # Implementation
///
/// Plain native values implement the two required methods and leave
/// [`as_schema_typed`](Self::as_schema_typed) at its `None` default:
///
/// ```
/// use edm_ser::EdmValue;
/// use edm_model::NativeType;
/// use std::any::Any;
///
/// struct Order {
///     id: i64,
/// }
///
/// impl EdmValue for Order {
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///
///     fn native_type(&self) -> NativeType {
///         NativeType::of::<Self>()
///     }
/// }
///
/// let order = Order { id: 1 };
/// assert_eq!(order.native_type(), NativeType::of::<Order>());
/// assert!(order.as_schema_typed().is_none());
/// # let _ = order.id;
/// ```
pub trait EdmValue: Any + Send + Sync {
    /// Returns the value as [`Any`], for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Returns the descriptor of the value's actual runtime type.
    fn native_type(&self) -> NativeType;

    /// Returns the self-describing capability, when the value carries its
    /// own schema type.
    #[inline]
    fn as_schema_typed(&self) -> Option<&dyn SchemaTyped> {
        None
    }
}

// -----------------------------------------------------------------------------
// Native impls

macro_rules! impl_edm_value {
    ($($ty:ty),* $(,)?) => {$(
        impl EdmValue for $ty {
            #[inline]
            fn as_any(&self) -> &dyn Any {
                self
            }

            #[inline]
            fn native_type(&self) -> NativeType {
                NativeType::of::<$ty>()
            }
        }
    )*};
}

impl_edm_value! {
    bool,
    i32,
    i64,
    f64,
    String,
    DateTime<Utc>,
    DateTime<FixedOffset>,
}

impl<T: EdmValue> EdmValue for Option<T> {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn native_type(&self) -> NativeType {
        NativeType::of::<Self>()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::EdmValue;
    use edm_model::NativeType;

    #[test]
    fn native_impls_report_their_own_type() {
        let value = 42_i32;
        assert_eq!(value.native_type(), NativeType::of::<i32>());

        let optional = Some(String::from("x"));
        assert_eq!(optional.native_type(), NativeType::of::<Option<String>>());
    }

    #[test]
    fn plain_values_are_not_self_describing() {
        assert!(7_i64.as_schema_typed().is_none());
    }
}
