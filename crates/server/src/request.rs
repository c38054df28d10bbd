//! Route-time views of a request.
//!
//! - `RouteContext`: the request head as seen by route filters
//! - `PathParams`: named captures of the matched route

use http::{HeaderMap, Method, Request, Uri, Version};
use matchit::Params;
use micro_gateway::PathMatch;

/// The head of a request being routed. Filters decide on this alone, the body is not
/// touched until a route has been chosen.
#[derive(Debug, Clone, Copy)]
pub struct RouteContext<'req> {
    method: &'req Method,
    uri: &'req Uri,
    version: Version,
    headers: &'req HeaderMap,
}

impl<'req> RouteContext<'req> {
    pub fn new<B>(request: &'req Request<B>) -> Self {
        Self { method: request.method(), uri: request.uri(), version: request.version(), headers: request.headers() }
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        self.method
    }

    /// Returns the URI of the request
    pub fn uri(&self) -> &Uri {
        self.uri
    }

    /// Returns the HTTP version of the request
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &HeaderMap {
        self.headers
    }
}

/// Named captures of the matched route, e.g. `method` in `/api/{method}`.
#[derive(Debug, Clone)]
pub struct PathParams<'server, 'req> {
    kind: PathParamsKind<'server, 'req>,
}

#[derive(Debug, Clone)]
enum PathParamsKind<'server, 'req> {
    None,
    Params(Params<'server, 'req>),
}

impl<'server, 'req> PathParams<'server, 'req> {
    #[inline]
    fn new(params: Params<'server, 'req>) -> Self {
        if params.is_empty() { Self::empty() } else { Self { kind: PathParamsKind::Params(params) } }
    }

    #[inline]
    pub fn empty() -> Self {
        Self { kind: PathParamsKind::None }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            PathParamsKind::None => true,
            PathParamsKind::Params(params) => params.is_empty(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match &self.kind {
            PathParamsKind::None => 0,
            PathParamsKind::Params(params) => params.len(),
        }
    }

    /// Gets the value of a path parameter by its name
    #[inline]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&'req str> {
        match &self.kind {
            PathParamsKind::Params(params) => params.get(key),
            PathParamsKind::None => None,
        }
    }
}

impl<'server, 'req> From<Params<'server, 'req>> for PathParams<'server, 'req> {
    fn from(params: Params<'server, 'req>) -> Self {
        PathParams::new(params)
    }
}

impl PathMatch for PathParams<'_, '_> {
    fn param(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}
