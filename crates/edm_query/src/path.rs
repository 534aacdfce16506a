use std::fmt;

// -----------------------------------------------------------------------------
// PathSegment

/// One segment of a pre-computed request path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// An entity set or singleton name.
    NavigationSource(Box<str>),

    /// A key into the preceding collection.
    Key(Box<str>),

    /// A structural or navigation property name.
    Property(Box<str>),
}

// -----------------------------------------------------------------------------
// ResourcePath

/// The pre-computed path of the request being served.
///
/// The serializer core carries the path through context derivation
/// unmodified; it never computes or rewrites one. Routing owns path
/// construction.
///
/// # Examples
///
/// ```
/// use edm_query::{PathSegment, ResourcePath};
///
/// let path = ResourcePath::new(vec![
///     PathSegment::NavigationSource("Orders".into()),
///     PathSegment::Key("42".into()),
///     PathSegment::Property("Customer".into()),
/// ]);
///
/// assert_eq!(path.to_string(), "Orders(42)/Customer");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ResourcePath {
    segments: Vec<PathSegment>,
}

impl ResourcePath {
    /// Creates a path from its segments.
    #[inline]
    pub const fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Returns the segments of the path.
    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns `true` when the path has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::NavigationSource(name) | PathSegment::Property(name) => {
                    if !first {
                        f.write_str("/")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Key(key) => write!(f, "({key})")?,
            }
            first = false;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
