//! The structural type model a serialized resource graph must conform to.
//!
//! This crate owns the two halves of type identity the serializer works
//! with:
//!
//! - **Native types**: types as declared in the host program, carried as
//!   opaque [`NativeType`] descriptors ([`TypeId`](std::any::TypeId) plus a
//!   diagnostic name).
//! - **Schema types**: nodes of the externally-maintained schema
//!   ([`SchemaType`]), referenced through [`TypeRef`] (node + nullability).
//!
//! The [`SchemaModel`] trait is the lookup capability consumed by the
//! serializer core; [`EdmModel`] is the in-memory implementation.
//! [`TypeMappingCache`] memoizes lookups in both directions and is shared
//! process-wide across concurrent serialization passes.

// -----------------------------------------------------------------------------
// Modules

pub mod mapping;
pub mod model;
pub mod native;
pub mod navigation_source;
pub mod property;
pub mod schema_type;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use mapping::TypeMappingCache;
pub use model::{EdmModel, SchemaModel};
pub use native::NativeType;
pub use navigation_source::{NavigationSource, NavigationSourceKind};
pub use property::{Property, PropertyKind};
pub use schema_type::{PrimitiveKind, SchemaType, SchemaTypeKind, TypeRef};
