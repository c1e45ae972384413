//! Decode path representation for locating failures in nested values.
//!
//! This module provides [`DecodePath`] and [`PathSegment`]. Unlike a path that
//! is built while walking down into a value, a decode path is assembled while
//! an error bubbles *outward*: the combinator closest to the failure produces
//! an empty path, and every enclosing combinator prepends its own segment.

use std::collections::VecDeque;
use std::fmt::{self, Display};

/// A segment of a decode path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field access, rendered as `.name`
    Field(String),
    /// An array index access, rendered as `.[i]`
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{}", name),
            PathSegment::Index(idx) => write!(f, ".[{}]", idx),
        }
    }
}

/// The location of a decode failure relative to the value handed to the
/// outermost decoder.
///
/// # Example
///
/// ```rust
/// use shapecodec::DecodePath;
///
/// let path = DecodePath::root()
///     .prepend_field("email")
///     .prepend_index(0)
///     .prepend_field("users");
///
/// assert_eq!(path.to_string(), ".users.[0].email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DecodePath {
    segments: VecDeque<PathSegment>,
}

impl DecodePath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from segments listed root-first.
    pub fn from_segments(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Returns a new path with `segment` placed in front of the existing ones.
    pub fn prepend(mut self, segment: PathSegment) -> Self {
        self.segments.push_front(segment);
        self
    }

    /// Returns a new path with a field segment placed in front.
    pub fn prepend_field(self, name: impl Into<String>) -> Self {
        self.prepend(PathSegment::Field(name.into()))
    }

    /// Returns a new path with an index segment placed in front.
    pub fn prepend_index(self, index: usize) -> Self {
        self.prepend(PathSegment::Index(index))
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the segment closest to the failure, or None at the root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.back()
    }
}

impl Display for DecodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
