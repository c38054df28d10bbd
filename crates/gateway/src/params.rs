//! Positional call arguments.
//!
//! A request contributes named fields from its body and from its query string. The
//! names are only used while parsing: the call receives the *values*, body values first
//! and query values after, each in the order they were encountered. Duplicate names are
//! kept as separate values.

use crate::error::ParseError;
use serde_json::Value;

/// Ordered positional arguments of a method call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterList {
    values: Vec<Value>,
}

impl ParameterList {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Merges body fields and query fields, dropping the names.
    pub fn merge(body: Vec<(String, Value)>, query: Vec<(String, Value)>) -> Self {
        let values = body.into_iter().chain(query).map(|(_, value)| value).collect();
        Self { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the argument at `index` as a string slice, if it is a json string.
    pub fn str(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Value::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for ParameterList {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl IntoIterator for ParameterList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Decodes `application/x-www-form-urlencoded` bytes into ordered string fields.
///
/// Used for urlencoded bodies, bodies of unknown type and query strings alike.
pub(crate) fn parse_urlencoded(bytes: &[u8]) -> Result<Vec<(String, Value)>, ParseError> {
    let pairs = serde_urlencoded::from_bytes::<Vec<(String, String)>>(bytes).map_err(ParseError::invalid_form)?;
    Ok(pairs.into_iter().map(|(name, value)| (name, Value::String(value))).collect())
}

/// Decodes a raw query string; a missing query yields no fields.
pub(crate) fn parse_query(query: Option<&str>) -> Result<Vec<(String, Value)>, ParseError> {
    match query {
        Some(query) if !query.is_empty() => parse_urlencoded(query.as_bytes()),
        _ => Ok(vec![]),
    }
}
