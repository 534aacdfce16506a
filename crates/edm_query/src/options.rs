use std::any::Any;
use std::sync::Arc;

use crate::select_expand::SelectExpandClause;

// -----------------------------------------------------------------------------
// QueryOptions

/// The active query options of a request, read-only from the serializer's
/// perspective.
///
/// When a handle is attached to a serializer context it is the
/// *authoritative* source of the effective select/expand restriction:
/// whatever clause it reports (including "none") overrides the per-item
/// sub-clauses found along the descent.
pub trait QueryOptions: Send + Sync {
    /// Returns the processed select/expand clause, if the request carried
    /// one.
    fn select_expand(&self) -> Option<&SelectExpandClause>;

    /// Returns the opaque query context carried alongside, if any.
    fn query_context(&self) -> Option<&(dyn Any + Send + Sync)> {
        None
    }
}

// -----------------------------------------------------------------------------
// ProcessedQueryOptions

/// A minimal [`QueryOptions`] carrier for callers that already hold a
/// processed clause.
///
/// # Examples
///
/// ```
/// use edm_query::{ProcessedQueryOptions, QueryOptions, SelectExpandClause};
/// use std::sync::Arc;
///
/// let options = ProcessedQueryOptions::new(Some(Arc::new(SelectExpandClause::select_all())));
/// assert!(options.select_expand().is_some());
///
/// let empty = ProcessedQueryOptions::new(None);
/// assert!(empty.select_expand().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ProcessedQueryOptions {
    select_expand: Option<Arc<SelectExpandClause>>,
}

impl ProcessedQueryOptions {
    /// Creates a handle over an optional processed clause.
    #[inline]
    pub const fn new(select_expand: Option<Arc<SelectExpandClause>>) -> Self {
        Self { select_expand }
    }
}

impl QueryOptions for ProcessedQueryOptions {
    #[inline]
    fn select_expand(&self) -> Option<&SelectExpandClause> {
        self.select_expand.as_deref()
    }
}
