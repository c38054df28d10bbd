//! Method paths.

use crate::error::DispatchError;
use std::fmt;

/// Maximum number of segments a method path may have.
pub const MAX_SEGMENTS: usize = 3;

/// An ordered sequence of one to three method-name segments, e.g. `messages.getHistory`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    /// Creates a path, rejecting lengths outside `1..=3` and empty segments.
    pub fn new(segments: Vec<String>) -> Result<Self, DispatchError> {
        if segments.is_empty() || segments.len() > MAX_SEGMENTS {
            return Err(DispatchError::PathLength { len: segments.len() });
        }
        if segments.iter().any(String::is_empty) {
            return Err(DispatchError::EmptySegment);
        }
        Ok(Self { segments })
    }

    /// Splits a dotted method name into segments.
    pub fn parse_dotted(method: &str) -> Result<Self, DispatchError> {
        Self::new(method.split('.').map(str::to_owned).collect())
    }

    /// A single segment path, dots included.
    pub fn single(method: &str) -> Result<Self, DispatchError> {
        Self::new(vec![method.to_owned()])
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false, a path has at least one segment.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first(&self) -> &str {
        &self.segments[0]
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl TryFrom<Vec<String>> for ApiPath {
    type Error = DispatchError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_valid_lengths() {
        let cases: [&[&str]; 3] = [&["a"], &["a", "b"], &["a", "b", "c"]];
        for names in cases {
            let path = ApiPath::new(segments(names)).unwrap();
            assert_eq!(path.len(), names.len());
            assert_eq!(path.first(), "a");
        }
    }

    #[test]
    fn test_invalid_lengths() {
        assert_eq!(ApiPath::new(vec![]), Err(DispatchError::PathLength { len: 0 }));
        assert_eq!(ApiPath::new(segments(&["a", "b", "c", "d"])), Err(DispatchError::PathLength { len: 4 }));
        assert_eq!(ApiPath::parse_dotted("a.b.c.d"), Err(DispatchError::PathLength { len: 4 }));
    }

    #[test]
    fn test_dotted() {
        let path = ApiPath::parse_dotted("messages.getHistory").unwrap();
        assert_eq!(path.segments(), &["messages".to_owned(), "getHistory".to_owned()]);
        assert_eq!(path.to_string(), "messages.getHistory");

        assert_eq!(ApiPath::parse_dotted("messages..get"), Err(DispatchError::EmptySegment));
        assert_eq!(ApiPath::parse_dotted(""), Err(DispatchError::EmptySegment));
    }

    #[test]
    fn test_single_keeps_dots() {
        let path = ApiPath::single("a.b").unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.first(), "a.b");
    }
}
