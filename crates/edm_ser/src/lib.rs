//! Serialization context propagation for tree-shaped resource graphs.
//!
//! A writer descending a resource graph needs the same ambient state at
//! every level (schema model, request path, formatting options) plus a
//! small, precisely-scoped set of overrides per nesting: which navigation
//! source is current, which select/expand restriction is in force, and
//! whether the expansion is reference-only. This crate owns that
//! derivation, along with resolving the schema type of each instance the
//! writer encounters.
//!
//! The writer itself (bytes, JSON, XML) is an external collaborator; so
//! are HTTP transport and query parsing. They hand over a
//! [`SchemaModel`](edm_model::SchemaModel), a processed
//! [`SelectExpandClause`](edm_query::SelectExpandClause) and a
//! [`ResourcePath`](edm_query::ResourcePath), and drive the tree through
//! [`SerializerContext::nested`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::any::Any;
//!
//! use edm_model::{EdmModel, NativeType, Property, SchemaType, TypeRef};
//! use edm_ser::{EdmValue, ResourceContext, SerializerContext};
//!
//! struct Order;
//!
//! impl EdmValue for Order {
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!
//!     fn native_type(&self) -> NativeType {
//!         NativeType::of::<Self>()
//!     }
//! }
//!
//! let mut model = EdmModel::new();
//! let customer = model.register_type(SchemaType::entity("shop", "Customer", Vec::new()));
//! let order = model.register_type(SchemaType::entity(
//!     "shop",
//!     "Order",
//!     vec![Property::navigation("Customer", TypeRef::required(customer.clone()), false)],
//! ));
//! let customer_prop = order.find_property("Customer").unwrap().clone();
//!
//! model.add_entity_set("Customers", customer);
//! let orders = model.add_entity_set("Orders", order);
//! model.bind_navigation("Orders", "Customer", "Customers");
//!
//! let root = Arc::new(
//!     SerializerContext::builder()
//!         .model(Arc::new(model))
//!         .navigation_source(orders)
//!         .build(),
//! );
//!
//! // The writer enters the Customer navigation property of an order.
//! let resource = ResourceContext::with_value(root, None, Order);
//! let nested = SerializerContext::nested(&resource, Some(&customer_prop), None).unwrap();
//!
//! assert_eq!(nested.navigation_source().unwrap().name(), "Customers");
//! ```

// -----------------------------------------------------------------------------
// Modules

pub mod context;
pub mod error;
pub mod items;
pub mod resource;
pub mod value;

mod resolve;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use context::{MetadataLevel, SerializerContext, SerializerContextBuilder};
pub use error::{DeriveError, ResolveError, SerializeError};
pub use items::ContextItems;
pub use resource::ResourceContext;
pub use value::{EdmValue, SchemaTyped};
