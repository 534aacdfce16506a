use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::FixedOffset;

use edm_model::{NavigationSource, Property, SchemaModel, TypeMappingCache};
use edm_query::{QueryOptions, ResourcePath, SelectExpandClause, SelectItem};

use crate::error::DeriveError;
use crate::items::ContextItems;
use crate::resource::ResourceContext;

// -----------------------------------------------------------------------------
// MetadataLevel

/// How much metadata the payload should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MetadataLevel {
    /// Enough for a client that knows the model.
    #[default]
    Minimal,

    /// Everything, including what a client could derive itself.
    Full,

    /// No metadata at all.
    None,
}

impl fmt::Display for MetadataLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimal => f.pad("minimal"),
            Self::Full => f.pad("full"),
            Self::None => f.pad("none"),
        }
    }
}

// -----------------------------------------------------------------------------
// SerializerContext

/// Everything a nested write needs while the writer descends the resource
/// graph.
///
/// A context tree lives for one serialization pass. The root is built by
/// the request pipeline through [`builder`](Self::builder); every other
/// node is built exactly once by [`nested`](Self::nested) as the writer
/// enters a nested or expanded property, and is never mutated afterwards.
/// The only shared mutable state in a tree is the [`ContextItems`] bag.
///
/// # Examples
///
/// ```
/// use edm_model::EdmModel;
/// use edm_ser::{MetadataLevel, SerializerContext};
/// use std::sync::Arc;
///
/// let model = Arc::new(EdmModel::new());
/// let context = SerializerContext::builder()
///     .model(model)
///     .metadata_level(MetadataLevel::Full)
///     .build();
///
/// assert_eq!(context.metadata_level(), MetadataLevel::Full);
/// assert!(context.select_expand().is_none());
/// ```
pub struct SerializerContext {
    model: Option<Arc<dyn SchemaModel>>,
    mapping: Arc<TypeMappingCache>,
    request: Option<Arc<dyn Any + Send + Sync>>,
    path: Option<Arc<ResourcePath>>,
    query_options: Option<Arc<dyn QueryOptions>>,
    root_element_name: Option<Box<str>>,
    metadata_level: MetadataLevel,
    timezone: Option<FixedOffset>,
    skip_expensive_availability_checks: bool,
    expand_reference: bool,
    items: ContextItems,
    navigation_source: Option<Arc<NavigationSource>>,
    select_expand: Option<Arc<SelectExpandClause>>,
    edm_property: Option<Arc<Property>>,
    current_select_item: Option<SelectItem>,
    expanded_resource: Option<ResourceContext>,
}

impl SerializerContext {
    /// Starts building a root context.
    #[inline]
    pub fn builder() -> SerializerContextBuilder {
        SerializerContextBuilder::new()
    }

    /// Creates a root context over a model with default options.
    #[inline]
    pub fn new(model: Arc<dyn SchemaModel>) -> Self {
        Self::builder().model(model).build()
    }

    /// Derives the context for writing a nested or expanded property.
    ///
    /// `resource` is the resource being expanded, `property` the schema
    /// property that causes the nested write (`None` for dynamic
    /// properties), and `select_item` the entry of the select/expand
    /// clause responsible for the expansion, if any.
    ///
    /// Ambient state (model, request, path, formatting options, the
    /// extensibility bag) is inherited from the resource's own context.
    /// The navigation source and effective restriction of the new context
    /// follow the select item's shape. Without a shape to go by, or when
    /// the shape names a target the model could not resolve, the
    /// navigation source is re-derived from the schema's declared
    /// navigation targets, and failing that inherited outright.
    ///
    /// # Errors
    ///
    /// [`DeriveError::MissingExpandedResource`] if `resource` holds no
    /// concrete instance. Every other ambiguity falls back instead of
    /// failing.
    pub fn nested(
        resource: &ResourceContext,
        property: Option<&Arc<Property>>,
        select_item: Option<&SelectItem>,
    ) -> Result<Self, DeriveError> {
        if resource.value().is_none() {
            return Err(DeriveError::MissingExpandedResource);
        }

        let parent = resource.serializer_context();

        let mut context = Self {
            model: parent.model.clone(),
            mapping: parent.mapping.clone(),
            request: parent.request.clone(),
            path: parent.path.clone(),
            query_options: parent.query_options.clone(),
            root_element_name: parent.root_element_name.clone(),
            metadata_level: parent.metadata_level,
            timezone: parent.timezone,
            skip_expensive_availability_checks: parent.skip_expensive_availability_checks,
            expand_reference: false,
            items: parent.items.clone(),
            navigation_source: None,
            select_expand: None,
            edm_property: property.cloned(),
            current_select_item: select_item.cloned(),
            expanded_resource: Some(resource.clone()),
        };

        match select_item {
            Some(SelectItem::ExpandedNavigation(item)) => {
                // The sub-clause stays on the item and surfaces through the
                // read-time fallback, so an inherited query-options handle
                // still dominates it.
                context.navigation_source = item.navigation_source().cloned();
            }
            Some(SelectItem::PathSelect(item)) => {
                context.select_expand = item.select_expand().cloned();
                // A plain selected property does not change which
                // navigation source is current.
                context.navigation_source = resource.navigation_source().cloned();
            }
            Some(SelectItem::ExpandedReference(item)) => {
                context.expand_reference = true;
                context.navigation_source = item.navigation_source().cloned();
            }
            None => {}
        }

        if select_item.is_none()
            || context
                .navigation_source
                .as_ref()
                .is_some_and(|source| source.is_unknown())
        {
            context.navigation_source = match property {
                Some(property)
                    if property.is_navigation() && parent.navigation_source.is_some() =>
                {
                    Self::declared_target(parent, resource, property)
                }
                _ => resource.navigation_source().cloned(),
            };
        }

        Ok(context)
    }

    // The navigation target a navigation property declares, looked up from
    // where the parent currently stands in the entity-set graph.
    fn declared_target(
        parent: &SerializerContext,
        resource: &ResourceContext,
        property: &Arc<Property>,
    ) -> Option<Arc<NavigationSource>> {
        let source = parent.navigation_source.as_ref()?;

        let Some(model) = parent.model.as_deref() else {
            log::debug!(
                "no schema model attached; inheriting navigation source for `{}`",
                property.name(),
            );
            return resource.navigation_source().cloned();
        };

        match model.find_navigation_target(source, property) {
            Some(target) => Some(target),
            None => {
                log::debug!(
                    "no navigation target for `{}` from `{}`; inheriting the parent's",
                    property.name(),
                    source.name(),
                );
                resource.navigation_source().cloned()
            }
        }
    }

    /// Replaces the effective select/expand restriction with an explicit
    /// override, consuming the context.
    ///
    /// The override takes precedence over an attached query-options handle
    /// and over any select-item sub-clause.
    #[inline]
    pub fn with_select_expand(mut self, clause: Arc<SelectExpandClause>) -> Self {
        self.select_expand = Some(clause);
        self
    }

    /// Returns the schema model in force for the pass.
    #[inline]
    pub fn model(&self) -> Option<&Arc<dyn SchemaModel>> {
        self.model.as_ref()
    }

    /// Returns the shared type mapping cache.
    #[inline]
    pub const fn mapping(&self) -> &Arc<TypeMappingCache> {
        &self.mapping
    }

    /// Returns the opaque request handle, passed through unmodified.
    #[inline]
    pub fn request(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.request.as_ref()
    }

    /// Returns the pre-computed request path.
    #[inline]
    pub fn path(&self) -> Option<&Arc<ResourcePath>> {
        self.path.as_ref()
    }

    /// Returns the attached query-options handle.
    #[inline]
    pub fn query_options(&self) -> Option<&Arc<dyn QueryOptions>> {
        self.query_options.as_ref()
    }

    /// Returns the root element name, where the format needs one.
    #[inline]
    pub fn root_element_name(&self) -> Option<&str> {
        self.root_element_name.as_deref()
    }

    /// Returns the metadata verbosity level.
    #[inline(always)]
    pub const fn metadata_level(&self) -> MetadataLevel {
        self.metadata_level
    }

    /// Returns the timezone values should be rendered in.
    #[inline(always)]
    pub const fn timezone(&self) -> Option<FixedOffset> {
        self.timezone
    }

    /// Returns whether expensive availability checks are skipped.
    #[inline(always)]
    pub const fn skips_expensive_availability_checks(&self) -> bool {
        self.skip_expensive_availability_checks
    }

    /// Returns whether the current expansion emits only a reference to the
    /// related resource.
    #[inline(always)]
    pub const fn is_expand_reference(&self) -> bool {
        self.expand_reference
    }

    /// Returns the extensibility bag shared across the context tree.
    #[inline(always)]
    pub const fn items(&self) -> &ContextItems {
        &self.items
    }

    /// Returns the navigation source in force.
    #[inline]
    pub fn navigation_source(&self) -> Option<&Arc<NavigationSource>> {
        self.navigation_source.as_ref()
    }

    /// Returns the schema property whose nesting created this context;
    /// `None` at the root and for dynamic properties.
    #[inline]
    pub fn edm_property(&self) -> Option<&Arc<Property>> {
        self.edm_property.as_ref()
    }

    /// Returns the select item responsible for this expansion, if any.
    #[inline]
    pub fn current_select_item(&self) -> Option<&SelectItem> {
        self.current_select_item.as_ref()
    }

    /// Returns the ancestor resource being expanded; `None` at the root.
    #[inline]
    pub fn expanded_resource(&self) -> Option<&ResourceContext> {
        self.expanded_resource.as_ref()
    }

    /// Returns the select/expand restriction in force, or `None` for "no
    /// restriction".
    ///
    /// The value is computed on demand rather than stored, because an
    /// attached query-options handle can finalize its clause after the
    /// context is built. Precedence, first match wins:
    ///
    /// 1. an explicit override on this context (a path-select sub-clause
    ///    or [`with_select_expand`](Self::with_select_expand));
    /// 2. the attached query-options handle: its processed clause, *or no
    ///    restriction* when it reports none;
    /// 3. the current expanded-navigation select item's sub-clause;
    /// 4. no restriction.
    pub fn select_expand(&self) -> Option<&SelectExpandClause> {
        if let Some(clause) = self.select_expand.as_deref() {
            return Some(clause);
        }

        if let Some(options) = self.query_options.as_deref() {
            return options.select_expand();
        }

        if let Some(SelectItem::ExpandedNavigation(item)) = &self.current_select_item {
            return item.select_expand().map(|clause| clause.as_ref());
        }

        None
    }
}

impl fmt::Debug for SerializerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerContext")
            .field("navigation_source", &self.navigation_source)
            .field("metadata_level", &self.metadata_level)
            .field("expand_reference", &self.expand_reference)
            .field("edm_property", &self.edm_property)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// SerializerContextBuilder

/// Builds the root [`SerializerContext`] of a serialization pass.
///
/// Everything is optional except what the pass will actually exercise: a
/// context without a model fails only once schema-type resolution is
/// attempted.
pub struct SerializerContextBuilder {
    context: SerializerContext,
}

impl SerializerContextBuilder {
    fn new() -> Self {
        Self {
            context: SerializerContext {
                model: None,
                mapping: Arc::new(TypeMappingCache::new()),
                request: None,
                path: None,
                query_options: None,
                root_element_name: None,
                metadata_level: MetadataLevel::default(),
                timezone: None,
                skip_expensive_availability_checks: false,
                expand_reference: false,
                items: ContextItems::new(),
                navigation_source: None,
                select_expand: None,
                edm_property: None,
                current_select_item: None,
                expanded_resource: None,
            },
        }
    }

    /// Sets the schema model for the pass.
    #[inline]
    pub fn model(mut self, model: Arc<dyn SchemaModel>) -> Self {
        self.context.model = Some(model);
        self
    }

    /// Shares a process-wide mapping cache instead of a per-pass one.
    ///
    /// One cache per model is the intended shape; every pass over the same
    /// model should hand in the same cache.
    #[inline]
    pub fn mapping(mut self, mapping: Arc<TypeMappingCache>) -> Self {
        self.context.mapping = mapping;
        self
    }

    /// Attaches the opaque request handle.
    #[inline]
    pub fn request(mut self, request: Arc<dyn Any + Send + Sync>) -> Self {
        self.context.request = Some(request);
        self
    }

    /// Sets the pre-computed request path.
    #[inline]
    pub fn path(mut self, path: Arc<ResourcePath>) -> Self {
        self.context.path = Some(path);
        self
    }

    /// Attaches the active query options; they become the authoritative
    /// source of the effective restriction.
    #[inline]
    pub fn query_options(mut self, options: Arc<dyn QueryOptions>) -> Self {
        self.context.query_options = Some(options);
        self
    }

    /// Sets the root element name.
    #[inline]
    pub fn root_element_name(mut self, name: &str) -> Self {
        self.context.root_element_name = Some(name.into());
        self
    }

    /// Sets the metadata verbosity level.
    #[inline]
    pub fn metadata_level(mut self, level: MetadataLevel) -> Self {
        self.context.metadata_level = level;
        self
    }

    /// Sets the timezone values should be rendered in.
    #[inline]
    pub fn timezone(mut self, timezone: FixedOffset) -> Self {
        self.context.timezone = Some(timezone);
        self
    }

    /// Skips availability checks that are expensive to evaluate.
    #[inline]
    pub fn skip_expensive_availability_checks(mut self, skip: bool) -> Self {
        self.context.skip_expensive_availability_checks = skip;
        self
    }

    /// Sets the navigation source the root resource belongs to.
    #[inline]
    pub fn navigation_source(mut self, source: Arc<NavigationSource>) -> Self {
        self.context.navigation_source = Some(source);
        self
    }

    /// Sets an explicit select/expand restriction override.
    #[inline]
    pub fn select_expand(mut self, clause: Arc<SelectExpandClause>) -> Self {
        self.context.select_expand = Some(clause);
        self
    }

    /// Finishes the root context.
    #[inline]
    pub fn build(self) -> SerializerContext {
        self.context
    }
}

// -----------------------------------------------------------------------------
// Tests
