//! The pre-parsed query surface the serializer core consumes.
//!
//! Nothing in this crate parses query strings: parsing belongs to an
//! external layer. What lives here are the *processed* value types that
//! layer hands over: the [`SelectExpandClause`] restriction tree, the
//! closed [`SelectItem`] shapes that drive context derivation, the
//! read-only [`QueryOptions`] handle, and the opaque [`ResourcePath`].

// -----------------------------------------------------------------------------
// Modules

pub mod options;
pub mod path;
pub mod select_expand;
pub mod select_item;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use options::{ProcessedQueryOptions, QueryOptions};
pub use path::{PathSegment, ResourcePath};
pub use select_expand::SelectExpandClause;
pub use select_item::{
    ExpandedNavigationItem, ExpandedReferenceItem, PathSelectItem, SelectItem,
};
