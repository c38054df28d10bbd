//! Composable request filters.
//!
//! Several items may be registered under the same route; the first one whose filter
//! accepts the request wins. Filters only see the [`RouteContext`], never the body.
//!
//! ```
//! use micro_gateway_server::router::filter::{all_filter, get_method, header};
//!
//! let mut filter = all_filter();
//! filter.and(get_method()).and(header("x-api-key", "secret").unwrap());
//! ```

use crate::request::RouteContext;
use http::{HeaderName, HeaderValue, Method};

pub trait Filter: Send + Sync {
    /// Returns `true` if the request should be handled by the filtered item.
    fn matches(&self, req: &RouteContext<'_>) -> bool;
}

struct FnFilter<F: Fn(&RouteContext<'_>) -> bool>(F);

impl<F: Fn(&RouteContext<'_>) -> bool + Send + Sync> Filter for FnFilter<F> {
    fn matches(&self, req: &RouteContext<'_>) -> bool {
        (self.0)(req)
    }
}

/// Creates a new filter from a closure.
pub fn fn_filter<F>(f: F) -> impl Filter
where
    F: Fn(&RouteContext<'_>) -> bool + Send + Sync,
{
    FnFilter(f)
}

/// Creates a new OR-composed filter chain.
pub fn any_filter() -> AnyFilter {
    AnyFilter::new()
}

/// Compose filters with OR logic. An empty chain accepts everything.
#[derive(Default)]
pub struct AnyFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl AnyFilter {
    fn new() -> Self {
        Self::default()
    }

    pub fn or<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl Filter for AnyFilter {
    fn matches(&self, req: &RouteContext<'_>) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|filter| filter.matches(req))
    }
}

/// Creates a new AND-composed filter chain.
pub fn all_filter() -> AllFilter {
    AllFilter::new()
}

/// Compose filters with AND logic. An empty chain accepts everything.
#[derive(Default)]
pub struct AllFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl AllFilter {
    fn new() -> Self {
        Self::default()
    }

    pub fn and<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl Filter for AllFilter {
    fn matches(&self, req: &RouteContext<'_>) -> bool {
        self.filters.iter().all(|filter| filter.matches(req))
    }
}

#[derive(Debug)]
pub struct MethodFilter(Method);

impl Filter for MethodFilter {
    fn matches(&self, req: &RouteContext<'_>) -> bool {
        self.0.eq(req.method())
    }
}

macro_rules! method_filter {
    ($method:ident, $upper_case_method:ident) => {
        #[doc = concat!("Creates a filter that matches HTTP ", stringify!($upper_case_method), " requests.")]
        #[inline]
        pub fn $method() -> MethodFilter {
            MethodFilter(Method::$upper_case_method)
        }
    };
}

method_filter!(get_method, GET);
method_filter!(post_method, POST);

/// Creates a filter that matches a specific header name and value.
pub fn header<K, V>(header_name: K, header_value: V) -> Result<HeaderFilter, http::Error>
where
    HeaderName: TryFrom<K>,
    <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
    HeaderValue: TryFrom<V>,
    <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
{
    let name = <HeaderName as TryFrom<K>>::try_from(header_name).map_err(Into::into)?;
    let value = <HeaderValue as TryFrom<V>>::try_from(header_value).map_err(Into::into)?;
    Ok(HeaderFilter(name, value))
}

#[derive(Debug)]
pub struct HeaderFilter(HeaderName, HeaderValue);

impl Filter for HeaderFilter {
    fn matches(&self, req: &RouteContext<'_>) -> bool {
        req.headers().get(&self.0).is_some_and(|value| self.1.eq(value))
    }
}
