use edm_model::{NativeType, SchemaModel, TypeRef};

use crate::context::SerializerContext;
use crate::error::ResolveError;
use crate::value::EdmValue;

// -----------------------------------------------------------------------------
// Instance schema-type resolution

impl SerializerContext {
    /// Resolves the schema type of an instance about to be written.
    ///
    /// `declared` is the statically-declared native type the writer knows
    /// the instance by; the instance itself may be more derived.
    ///
    /// Resolution order:
    ///
    /// 1. a [self-describing](crate::SchemaTyped) value reports its own
    ///    type and wins outright;
    /// 2. the declared native type is resolved through the mapping cache;
    /// 3. on a miss, the instance's *actual* runtime type is tried instead
    ///    (an instance declared through a base type);
    /// 4. when both resolve but disagree, the actual runtime mapping wins:
    ///    the payload must reflect the most-derived known schema type.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MissingDescribedType`] for a self-describing
    ///   value that reports no type;
    /// - [`ResolveError::MissingModel`] when the context carries no model;
    /// - [`ResolveError::UnresolvableNativeType`] when neither lookup
    ///   finds a mapping.
    pub fn resolve_instance_schema_type(
        &self,
        value: &dyn EdmValue,
        declared: NativeType,
    ) -> Result<TypeRef, ResolveError> {
        if let Some(described) = value.as_schema_typed() {
            return described
                .schema_type()
                .ok_or(ResolveError::MissingDescribedType(value.native_type().name()));
        }

        let model: &dyn SchemaModel = match self.model() {
            Some(model) => model.as_ref(),
            None => return Err(ResolveError::MissingModel),
        };

        let mapping = self.mapping();
        let actual = value.native_type();

        match mapping.resolve_schema_type(declared, model) {
            Some(declared_ref) => {
                if actual != declared {
                    if let Some(actual_ref) = mapping.resolve_schema_type(actual, model) {
                        if actual_ref != declared_ref {
                            log::trace!(
                                "preferring runtime type `{}` over declared `{}`",
                                actual.name(),
                                declared.name(),
                            );
                            return Ok(actual_ref);
                        }
                    }
                }
                Ok(declared_ref)
            }
            None => mapping
                .resolve_schema_type(actual, model)
                .ok_or(ResolveError::UnresolvableNativeType(actual.name())),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::Arc;

    use edm_model::{EdmModel, NativeType, SchemaType, TypeRef};

    use crate::context::SerializerContext;
    use crate::error::ResolveError;
    use crate::value::{EdmValue, SchemaTyped};

    struct Person;
    struct Employee;
    struct Visitor;

    macro_rules! impl_plain_value {
        ($($ty:ty),*) => {$(
            impl EdmValue for $ty {
                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn native_type(&self) -> NativeType {
                    NativeType::of::<Self>()
                }
            }
        )*};
    }

    impl_plain_value!(Person, Employee, Visitor);

    struct Described {
        ty: Option<TypeRef>,
    }

    impl SchemaTyped for Described {
        fn schema_type(&self) -> Option<TypeRef> {
            self.ty.clone()
        }
    }

    impl EdmValue for Described {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn native_type(&self) -> NativeType {
            NativeType::of::<Self>()
        }

        fn as_schema_typed(&self) -> Option<&dyn SchemaTyped> {
            Some(self)
        }
    }

    struct Fixture {
        context: SerializerContext,
        person_type: TypeRef,
        employee_type: TypeRef,
    }

    fn fixture() -> Fixture {
        let mut model = EdmModel::new();
        let person = model.register_type(SchemaType::entity("people", "Person", Vec::new()));
        let employee = model.register_type(SchemaType::entity("people", "Employee", Vec::new()));

        let person_type = TypeRef::required(person);
        let employee_type = TypeRef::required(employee);
        model.map_native::<Person>(person_type.clone());
        model.map_native::<Employee>(employee_type.clone());

        Fixture {
            context: SerializerContext::new(Arc::new(model)),
            person_type,
            employee_type,
        }
    }

    #[test]
    fn declared_type_resolves_directly() {
        let fx = fixture();

        let resolved = fx
            .context
            .resolve_instance_schema_type(&Person, NativeType::of::<Person>())
            .unwrap();
        assert_eq!(resolved, fx.person_type);
    }

    #[test]
    fn runtime_type_wins_over_declared() {
        let fx = fixture();

        // An Employee instance declared through the Person type must come
        // out as an Employee on the wire.
        let resolved = fx
            .context
            .resolve_instance_schema_type(&Employee, NativeType::of::<Person>())
            .unwrap();
        assert_eq!(resolved, fx.employee_type);
    }

    #[test]
    fn runtime_type_rescues_an_unmapped_declaration() {
        let fx = fixture();

        let resolved = fx
            .context
            .resolve_instance_schema_type(&Employee, NativeType::of::<Visitor>())
            .unwrap();
        assert_eq!(resolved, fx.employee_type);
    }

    #[test]
    fn unresolvable_type_names_the_runtime_type() {
        let fx = fixture();

        let err = fx
            .context
            .resolve_instance_schema_type(&Visitor, NativeType::of::<Visitor>())
            .unwrap_err();
        let ResolveError::UnresolvableNativeType(name) = err else {
            panic!("expected the unresolvable variant, got {err:?}");
        };
        assert!(name.contains("Visitor"));
    }

    #[test]
    fn self_described_value_wins_without_a_model() {
        let fx = fixture();
        let value = Described {
            ty: Some(fx.employee_type.clone()),
        };

        // Even a model-less context resolves a self-describing value.
        let modelless = SerializerContext::builder().build();
        let resolved = modelless
            .resolve_instance_schema_type(&value, NativeType::of::<Person>())
            .unwrap();
        assert_eq!(resolved, fx.employee_type);
    }

    #[test]
    fn self_described_without_a_type_is_fatal() {
        let fx = fixture();
        let value = Described { ty: None };

        let err = fx
            .context
            .resolve_instance_schema_type(&value, NativeType::of::<Person>())
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingDescribedType(_)));
    }

    #[test]
    fn missing_model_is_fatal() {
        let context = SerializerContext::builder().build();

        let err = context
            .resolve_instance_schema_type(&Person, NativeType::of::<Person>())
            .unwrap_err();
        assert_eq!(err, ResolveError::MissingModel);
    }
}
