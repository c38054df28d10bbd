//! Route table mapping url patterns to path resolvers.
//!
//! Patterns use `matchit` syntax, e.g. `/api/{session}/{method}`. Each pattern holds a
//! list of items; an item pairs a [`Filter`] with the [`PathResolver`] that turns the
//! captures into a [`Resolution`].

pub mod filter;

use crate::request::{PathParams, RouteContext};
use filter::{AllFilter, Filter};
use micro_gateway::{DispatchError, PathResolver, Resolution};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

type RouterFilter = dyn Filter + Send + Sync + 'static;
type InnerRouter<T> = matchit::Router<T>;

pub struct Router {
    inner_router: InnerRouter<Vec<RouterItem>>,
}

pub struct RouterItem {
    filter: Box<RouterFilter>,
    resolver: Arc<dyn PathResolver>,
}

/// Result of matching a route, containing matched items and path parameters
pub struct RouteResult<'router, 'req> {
    router_items: &'router [RouterItem],
    params: PathParams<'router, 'req>,
}

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("invalid route '{route}': {source}")]
    InvalidRoute {
        route: String,
        #[source]
        source: matchit::InsertError,
    },
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Matches a path against the router's routes. An unknown path yields an empty result.
    pub fn at<'router, 'req>(&'router self, path: &'req str) -> RouteResult<'router, 'req> {
        self.inner_router
            .at(path)
            .map(|matched| RouteResult { router_items: matched.value.as_slice(), params: matched.params.into() })
            .unwrap_or_else(|e| {
                trace!("match '{}' error: {}", path, e);
                RouteResult::empty()
            })
    }

    /// Resolves a request: the first item of the matched route whose filter accepts it.
    ///
    /// Returns `None` when no route or no item matches.
    pub fn resolve<B>(&self, request: &http::Request<B>) -> Option<Result<Resolution, DispatchError>> {
        let route = self.at(request.uri().path());
        let ctx = RouteContext::new(request);

        route
            .router_items()
            .iter()
            .find(|item| item.filter().matches(&ctx))
            .map(|item| item.resolver().resolve(route.params()))
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").finish_non_exhaustive()
    }
}

impl RouterItem {
    pub fn filter(&self) -> &RouterFilter {
        self.filter.as_ref()
    }

    pub fn resolver(&self) -> &dyn PathResolver {
        self.resolver.as_ref()
    }
}

impl<'router, 'req> RouteResult<'router, 'req> {
    fn empty() -> Self {
        Self { router_items: &[], params: PathParams::empty() }
    }

    /// Returns true if no routes were matched
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.router_items.is_empty()
    }

    pub fn params(&self) -> &PathParams<'router, 'req> {
        &self.params
    }

    pub fn router_items(&self) -> &'router [RouterItem] {
        self.router_items
    }
}

#[derive(Default)]
pub struct RouterBuilder {
    data: HashMap<String, Vec<RouterItemBuilder>>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, route: impl Into<String>, item_builder: RouterItemBuilder) -> Self {
        let vec = self.data.entry(route.into()).or_default();
        vec.push(item_builder);
        self
    }

    pub fn build(self) -> Result<Router, RouterError> {
        let mut inner_router = InnerRouter::new();

        for (route, items) in self.data {
            let router_items = items.into_iter().map(RouterItemBuilder::build).collect::<Vec<_>>();
            inner_router
                .insert(route.clone(), router_items)
                .map_err(|source| RouterError::InvalidRoute { route, source })?;
        }

        Ok(Router { inner_router })
    }
}

macro_rules! method_router_filter {
    ($method:ident, $method_name:ident) => {
        pub fn $method<R: PathResolver + 'static>(resolver: R) -> RouterItemBuilder {
            let mut filters = filter::all_filter();
            filters.and(filter::$method_name());
            RouterItemBuilder { filters, resolver: Arc::new(resolver) }
        }
    };
}

method_router_filter!(get, get_method);
method_router_filter!(post, post_method);

/// An item accepting every method.
pub fn any<R: PathResolver + 'static>(resolver: R) -> RouterItemBuilder {
    RouterItemBuilder { filters: filter::all_filter(), resolver: Arc::new(resolver) }
}

pub struct RouterItemBuilder {
    filters: AllFilter,
    resolver: Arc<dyn PathResolver>,
}

impl RouterItemBuilder {
    #[must_use]
    pub fn with<F: Filter + Send + Sync + 'static>(mut self, filter: F) -> Self {
        self.filters.and(filter);
        self
    }

    fn build(self) -> RouterItem {
        RouterItem { filter: Box::new(self.filters), resolver: self.resolver }
    }
}

#[cfg(test)]
mod tests {
    use super::filter::header;
    use super::{Router, RouterError, any, get, post};
    use http::{Method, Request};
    use micro_gateway::{DispatchError, DottedPathResolver, ExtensionSet, SinglePathResolver};
    use std::sync::Arc;

    fn system() -> Arc<ExtensionSet> {
        Arc::new(ExtensionSet::builder("system").build())
    }

    fn router() -> Router {
        Router::builder()
            .route("/api/{method}", get(DottedPathResolver::new()))
            .route("/api/{method}", post(DottedPathResolver::new()))
            .route("/api/{session}/{method}", get(DottedPathResolver::new()))
            .route("/system/{method}", post(SinglePathResolver::new(system())).with(header("x-admin", "1").unwrap()))
            .route("/system/{method}", any(SinglePathResolver::new(system())))
            .build()
            .unwrap()
    }

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    #[test]
    fn test_at() {
        let router = router();

        let result = router.at("/api/messages.send");
        assert_eq!(result.router_items().len(), 2);
        assert_eq!(result.params().get("method"), Some("messages.send"));

        assert!(router.at("/nowhere").is_empty());
        assert!(router.at("/api/a/b/c").is_empty());
    }

    #[test]
    fn test_resolve() {
        let router = router();

        let resolution = router.resolve(&request(Method::POST, "/api/messages.send?x=1")).unwrap().unwrap();
        assert_eq!(resolution.path.to_string(), "messages.send");
        assert_eq!(resolution.session, None);

        let resolution = router.resolve(&request(Method::GET, "/api/alice/getSelf")).unwrap().unwrap();
        assert_eq!(resolution.session.as_deref(), Some("alice"));

        let resolution = router.resolve(&request(Method::DELETE, "/system/getVersion")).unwrap().unwrap();
        assert_eq!(resolution.extension.unwrap().name(), "system");
    }

    #[test]
    fn test_unmatched() {
        let router = router();

        assert!(router.resolve(&request(Method::GET, "/nowhere")).is_none());
        assert!(router.resolve(&request(Method::DELETE, "/api/getSelf")).is_none());
        assert!(router.resolve(&request(Method::POST, "/api/alice/getSelf")).is_none());
    }

    #[test]
    fn test_bad_path_is_a_dispatch_error() {
        let result = router().resolve(&request(Method::GET, "/api/a.b.c.d")).unwrap();
        assert_eq!(result.unwrap_err(), DispatchError::PathLength { len: 4 });
    }

    #[test]
    fn test_conflicting_routes() {
        let result = Router::builder()
            .route("/api/{method}", get(DottedPathResolver::new()))
            .route("/api/{other}", get(DottedPathResolver::new()))
            .build();
        assert!(matches!(result, Err(RouterError::InvalidRoute { .. })));
    }
}
