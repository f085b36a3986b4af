//! # Field Paths
//!
//! Addresses a node inside a value tree. The textual form is dotted keys with
//! bracketed sequence indices: `targetUsername`, `nested.child[2].value`.
//! The empty path addresses the root and renders as `(root)`.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::CoreError;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A mapping key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

/// Location of a node in a value tree, from the root down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The path of the root node.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path extended by a mapping key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Returns a new path extended by a sequence index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The last mapping key on the path, if the path ends in one.
    pub fn last_key(&self) -> Option<&str> {
        match self.segments.last() {
            Some(PathSegment::Key(k)) => Some(k),
            _ => None,
        }
    }

    /// Parse the dotted/bracketed textual form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPath` for empty key segments, unterminated
    /// brackets, or non-numeric indices.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidPath {
            path: input.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        if input.is_empty() {
            return Ok(Self { segments });
        }

        let mut chars = input.chars().peekable();
        let mut key = String::new();
        // True right after a '.', where a key must follow.
        let mut expect_key = true;

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if key.is_empty() && expect_key {
                        return Err(invalid("empty key segment"));
                    }
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    expect_key = true;
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    } else if expect_key && !segments.is_empty() {
                        return Err(invalid("empty key segment"));
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) if d.is_ascii_digit() => digits.push(d),
                            Some(_) => return Err(invalid("index must be a non-negative integer")),
                            None => return Err(invalid("unterminated '['")),
                        }
                    }
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| invalid("index must be a non-negative integer"))?;
                    segments.push(PathSegment::Index(index));
                    expect_key = false;
                    if let Some(&next) = chars.peek() {
                        if next != '.' && next != '[' {
                            return Err(invalid("expected '.' or '[' after index"));
                        }
                    }
                }
                ']' => return Err(invalid("unexpected ']'")),
                other => {
                    key.push(other);
                    expect_key = false;
                }
            }
        }

        if !key.is_empty() {
            segments.push(PathSegment::Key(key));
        } else if expect_key {
            return Err(invalid("empty key segment"));
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(k) if i == 0 => write!(f, "{k}")?,
                PathSegment::Key(k) => write!(f, ".{k}")?,
                PathSegment::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(FieldPath::root().to_string(), "(root)");
        assert!(FieldPath::root().is_root());
    }

    #[test]
    fn test_display_dotted_and_indexed() {
        let path = FieldPath::root().key("nested").key("child").index(2).key("value");
        assert_eq!(path.to_string(), "nested.child[2].value");
    }

    #[test]
    fn test_display_leading_index() {
        let path = FieldPath::root().index(0).key("a");
        assert_eq!(path.to_string(), "[0].a");
    }

    #[test]
    fn test_parse_matches_display() {
        for text in ["targetUsername", "nested.child[2].value", "a[1][2]", "[0].a"] {
            let path = FieldPath::parse(text).unwrap();
            assert_eq!(path.to_string(), text);
        }
    }

    #[test]
    fn test_parse_empty_is_root() {
        assert!(FieldPath::parse("").unwrap().is_root());
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for bad in [".a", "a.", "a..b", "a.[0]"] {
            assert!(
                matches!(FieldPath::parse(bad), Err(CoreError::InvalidPath { .. })),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_bad_indices() {
        for bad in ["a[", "a[x]", "a[-1]", "a]", "a[0]b"] {
            assert!(FieldPath::parse(bad).is_err(), "expected '{bad}' to be rejected");
        }
    }

    #[test]
    fn test_last_key() {
        let path = FieldPath::root().key("outer").key("inner");
        assert_eq!(path.last_key(), Some("inner"));
        assert_eq!(path.index(3).last_key(), None);
    }

    #[test]
    fn test_serialize_as_string() {
        let path = FieldPath::root().key("a").index(1);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#""a[1]""#);
    }
}
