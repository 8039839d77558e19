//! Field paths: where in a (possibly nested) document a value lives.
//!
//! A path is a sequence of segments. Member segments name a member (or an
//! element, when nothing maps it), index segments address one array element
//! and the positional segment stands for "the matched element" (`$`).
//! `TypeAs` segments come from casts; they narrow the class used for the
//! following segments and contribute nothing to the rendered name.

mod parser;

use std::fmt;
use std::str::FromStr;

use crate::error::PathParseError;

pub use parser::PathParser;

/// A single segment in a field path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Member(String),
    Index(usize),
    /// The positional marker, rendered as `$`.
    Positional,
    /// Narrow the current class to a subtype. Zero width.
    TypeAs(String),
}

impl Segment {
    pub fn member(name: impl Into<String>) -> Self {
        Segment::Member(name.into())
    }

    /// True for segments that step into the elements of a collection.
    pub fn is_element_access(&self) -> bool {
        matches!(self, Segment::Index(_) | Segment::Positional)
    }

    pub fn as_member(&self) -> Option<&str> {
        match self {
            Segment::Member(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Member(name) => write!(f, "{}", name),
            Segment::Index(i) => write!(f, "{}", i),
            Segment::Positional => write!(f, "$"),
            Segment::TypeAs(name) => write!(f, "({})", name),
        }
    }
}

/// An ordered list of segments, not yet resolved against any class.
///
/// ```
/// use docrender::path::FieldPath;
///
/// let path = FieldPath::new().member("Pets").index(3).member("Type");
/// assert_eq!(path.to_string(), "Pets.3.Type");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Parse a raw dotted path such as `Pets[3].Type` or `pets.$.type`.
    pub fn parse(source: &str) -> Result<Self, PathParseError> {
        PathParser::new(source).parse()
    }

    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.0.push(Segment::Member(name.into()));
        self
    }

    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Segment::Index(i));
        self
    }

    pub fn positional(mut self) -> Self {
        self.0.push(Segment::Positional);
        self
    }

    pub fn type_as(mut self, class: impl Into<String>) -> Self {
        self.0.push(Segment::TypeAs(class.into()));
        self
    }

    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if matches!(segment, Segment::TypeAs(_)) {
                continue;
            }
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl From<Vec<Segment>> for FieldPath {
    fn from(segments: Vec<Segment>) -> Self {
        FieldPath(segments)
    }
}
