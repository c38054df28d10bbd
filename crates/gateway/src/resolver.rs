//! Turning a route match into a method path.
//!
//! The router owns the matching syntax; resolvers only read the named captures it
//! produced. Resolution is synchronous and never touches the request body, so a bad
//! path fails before any byte of the body is read.

use crate::error::DispatchError;
use crate::extension::ExtensionSet;
use crate::path::ApiPath;
use std::collections::HashMap;
use std::sync::Arc;

/// Capture name holding the method path.
pub const METHOD_PARAM: &str = "method";
/// Capture name holding the optional session.
pub const SESSION_PARAM: &str = "session";

/// Named captures of a route match.
pub trait PathMatch {
    fn param(&self, name: &str) -> Option<&str>;
}

impl PathMatch for HashMap<String, String> {
    fn param(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<const N: usize> PathMatch for [(&str, &str); N] {
    fn param(&self, name: &str) -> Option<&str> {
        self.iter().find(|(key, _)| *key == name).map(|(_, value)| *value)
    }
}

/// Where a request goes: the method path, the override table and the session.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub path: ApiPath,
    pub extension: Option<Arc<ExtensionSet>>,
    pub session: Option<String>,
}

impl Resolution {
    pub fn new(path: ApiPath) -> Self {
        Self { path, extension: None, session: None }
    }

    #[must_use]
    pub fn with_extension(mut self, extension: Arc<ExtensionSet>) -> Self {
        self.extension = Some(extension);
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }
}

pub trait PathResolver: Send + Sync {
    fn resolve(&self, matched: &dyn PathMatch) -> Result<Resolution, DispatchError>;
}

fn method_param(matched: &dyn PathMatch) -> Result<&str, DispatchError> {
    matched.param(METHOD_PARAM).ok_or(DispatchError::PathLength { len: 0 })
}

/// Reads `method` as a dotted path of up to three segments, plus an optional `session`.
///
/// Used by the client API routes: `/api/messages.send` reaches `messages` then `send`.
#[derive(Debug, Clone, Default)]
pub struct DottedPathResolver {
    extension: Option<Arc<ExtensionSet>>,
}

impl DottedPathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(extension: Arc<ExtensionSet>) -> Self {
        Self { extension: Some(extension) }
    }
}

impl PathResolver for DottedPathResolver {
    fn resolve(&self, matched: &dyn PathMatch) -> Result<Resolution, DispatchError> {
        let path = ApiPath::parse_dotted(method_param(matched)?)?;
        let session = matched.param(SESSION_PARAM).filter(|session| !session.is_empty()).map(str::to_owned);

        Ok(Resolution { path, extension: self.extension.clone(), session })
    }
}

/// Reads `method` as exactly one segment, dots included.
///
/// Used by routes whose methods only exist on the extension set.
#[derive(Debug, Clone)]
pub struct SinglePathResolver {
    extension: Arc<ExtensionSet>,
}

impl SinglePathResolver {
    pub fn new(extension: Arc<ExtensionSet>) -> Self {
        Self { extension }
    }
}

impl PathResolver for SinglePathResolver {
    fn resolve(&self, matched: &dyn PathMatch) -> Result<Resolution, DispatchError> {
        let path = ApiPath::single(method_param(matched)?)?;
        Ok(Resolution::new(path).with_extension(Arc::clone(&self.extension)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> Arc<ExtensionSet> {
        Arc::new(ExtensionSet::builder("system").build())
    }

    #[test]
    fn test_dotted() {
        let resolver = DottedPathResolver::with_extension(system());

        let resolution = resolver.resolve(&[("method", "channels.admin.ban")]).unwrap();
        assert_eq!(resolution.path.len(), 3);
        assert_eq!(resolution.session, None);
        assert_eq!(resolution.extension.unwrap().name(), "system");

        let resolution = resolver.resolve(&[("session", "alice"), ("method", "getSelf")]).unwrap();
        assert_eq!(resolution.path.first(), "getSelf");
        assert_eq!(resolution.session.as_deref(), Some("alice"));
    }

    #[test]
    fn test_dotted_rejects_long_paths() {
        let resolver = DottedPathResolver::new();
        let err = resolver.resolve(&[("method", "a.b.c.d")]).unwrap_err();
        assert_eq!(err, DispatchError::PathLength { len: 4 });
    }

    #[test]
    fn test_single() {
        let resolver = SinglePathResolver::new(system());
        let matched = HashMap::from([("method".to_owned(), "a.b".to_owned())]);

        let resolution = resolver.resolve(&matched).unwrap();
        assert_eq!(resolution.path.segments(), &["a.b".to_owned()]);
        assert!(resolution.extension.is_some());
    }

    #[test]
    fn test_missing_method_capture() {
        let err = SinglePathResolver::new(system()).resolve(&HashMap::<String, String>::new()).unwrap_err();
        assert_eq!(err, DispatchError::PathLength { len: 0 });
    }
}
