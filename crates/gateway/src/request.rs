//! Read-only view of the incoming request head.
//!
//! The body is consumed by the [`BodyParser`](crate::BodyParser) before dispatch, so
//! extensions only ever see the head: method, uri, version and headers.

use http::request::Parts;
use http::{HeaderMap, Method, Request, Uri, Version};

/// The head of the request being handled, shared with extension methods.
#[derive(Debug)]
pub struct RequestContext {
    parts: Parts,
}

impl RequestContext {
    pub fn new(parts: Parts) -> Self {
        Self { parts }
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Returns the URI of the request
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Returns the raw query string, if any
    pub fn query(&self) -> Option<&str> {
        self.parts.uri.query()
    }

    /// Returns the HTTP version of the request
    pub fn version(&self) -> Version {
        self.parts.version
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn parts(&self) -> &Parts {
        &self.parts
    }
}

impl From<Parts> for RequestContext {
    #[inline]
    fn from(parts: Parts) -> Self {
        Self::new(parts)
    }
}

impl From<Request<()>> for RequestContext {
    #[inline]
    fn from(request: Request<()>) -> Self {
        Self::new(request.into_parts().0)
    }
}
