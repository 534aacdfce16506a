use std::sync::Arc;

use edm_model::NavigationSource;

use crate::select_expand::SelectExpandClause;

// -----------------------------------------------------------------------------
// SelectItem

/// One entry of a [`SelectExpandClause`], in one of three closed shapes.
///
/// The shape decides how a derived serializer context picks up its
/// navigation source and effective restriction, so the variants are a
/// closed enum rather than a family of downcastable types: every consumer
/// dispatches exhaustively.
#[derive(Clone, Debug)]
pub enum SelectItem {
    /// A full expansion with its own nested sub-clause and an explicit
    /// navigation-target override.
    ExpandedNavigation(ExpandedNavigationItem),

    /// A plain selected path with an optional nested sub-clause and no
    /// navigation override.
    PathSelect(PathSelectItem),

    /// A reference-only expansion: only the identity of the related
    /// resource is emitted, never its body.
    ExpandedReference(ExpandedReferenceItem),
}

impl SelectItem {
    /// Returns the property path this item addresses.
    pub fn path(&self) -> &str {
        match self {
            Self::ExpandedNavigation(item) => item.path(),
            Self::PathSelect(item) => item.path(),
            Self::ExpandedReference(item) => item.path(),
        }
    }
}

// -----------------------------------------------------------------------------
// ExpandedNavigationItem

/// The expanded-navigation shape: `$expand=Prop($select=…;$expand=…)`.
#[derive(Clone, Debug)]
pub struct ExpandedNavigationItem {
    path: Box<str>,
    navigation_source: Option<Arc<NavigationSource>>,
    select_expand: Option<Arc<SelectExpandClause>>,
}

impl ExpandedNavigationItem {
    /// Creates the shape for the navigation property at `path`.
    pub fn new(
        path: &str,
        navigation_source: Option<Arc<NavigationSource>>,
        select_expand: Option<Arc<SelectExpandClause>>,
    ) -> Self {
        Self {
            path: path.into(),
            navigation_source,
            select_expand,
        }
    }

    /// Returns the property path of the expansion.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the explicit navigation-target override.
    #[inline]
    pub const fn navigation_source(&self) -> Option<&Arc<NavigationSource>> {
        self.navigation_source.as_ref()
    }

    /// Returns the nested sub-clause restricting the expanded subtree.
    #[inline]
    pub const fn select_expand(&self) -> Option<&Arc<SelectExpandClause>> {
        self.select_expand.as_ref()
    }
}

// -----------------------------------------------------------------------------
// PathSelectItem

/// The path-select shape: `$select=Prop` with an optional nested
/// sub-clause. A plain selected property never changes which navigation
/// source is current.
#[derive(Clone, Debug)]
pub struct PathSelectItem {
    path: Box<str>,
    select_expand: Option<Arc<SelectExpandClause>>,
}

impl PathSelectItem {
    /// Creates the shape for the property at `path`.
    pub fn new(path: &str, select_expand: Option<Arc<SelectExpandClause>>) -> Self {
        Self {
            path: path.into(),
            select_expand,
        }
    }

    /// Returns the selected property path.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the nested sub-clause, if the selection carried one.
    #[inline]
    pub const fn select_expand(&self) -> Option<&Arc<SelectExpandClause>> {
        self.select_expand.as_ref()
    }
}

// -----------------------------------------------------------------------------
// ExpandedReferenceItem

/// The reference-only shape: `$expand=Prop/$ref`.
#[derive(Clone, Debug)]
pub struct ExpandedReferenceItem {
    path: Box<str>,
    navigation_source: Option<Arc<NavigationSource>>,
}

impl ExpandedReferenceItem {
    /// Creates the shape for the navigation property at `path`.
    pub fn new(path: &str, navigation_source: Option<Arc<NavigationSource>>) -> Self {
        Self {
            path: path.into(),
            navigation_source,
        }
    }

    /// Returns the property path of the reference expansion.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the declared navigation target of the reference.
    #[inline]
    pub const fn navigation_source(&self) -> Option<&Arc<NavigationSource>> {
        self.navigation_source.as_ref()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ExpandedNavigationItem, PathSelectItem, SelectItem};

    #[test]
    fn path_dispatches_over_shapes() {
        let expanded = SelectItem::ExpandedNavigation(ExpandedNavigationItem::new(
            "Customer", None, None,
        ));
        let selected = SelectItem::PathSelect(PathSelectItem::new("Name", None));

        assert_eq!(expanded.path(), "Customer");
        assert_eq!(selected.path(), "Name");
    }
}
