//! Schema-aware serialization core.
//!
//! This facade crate re-exports the workspace members:
//!
//! - [`model`]: schema type nodes, native type descriptors, the
//!   [`SchemaModel`](model::SchemaModel) lookup capability and the
//!   [`TypeMappingCache`](model::TypeMappingCache).
//! - [`query`]: pre-parsed select/expand clauses, select item shapes and
//!   the query-options handle consumed by the serializer.
//! - [`ser`]: the per-pass [`SerializerContext`](ser::SerializerContext)
//!   tree, context derivation and runtime schema-type resolution.

pub use edm_model as model;
pub use edm_query as query;
pub use edm_ser as ser;
