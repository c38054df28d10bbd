//! Override methods that intercept single-segment paths.
//!
//! An [`ExtensionSet`] is attached to a route. When the requested path has exactly one
//! segment and the set declares a method of that name, the method is called instead of
//! the client's member of the same name. Unlike client methods, extension methods see
//! the client, the request head and the uploaded file.

use crate::body::FileHandle;
use crate::client::ApiClient;
use crate::params::ParameterList;
use crate::reply::{CallResult, Invocation};
use crate::request::RequestContext;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Everything an extension method may use. Built only once an override matched.
#[derive(Debug)]
pub struct ExtensionContext {
    client: Arc<ApiClient>,
    request: Arc<RequestContext>,
    file: Option<FileHandle>,
}

impl ExtensionContext {
    pub fn new(client: Arc<ApiClient>, request: Arc<RequestContext>, file: Option<FileHandle>) -> Self {
        Self { client, request, file }
    }

    /// The client the request was routed to
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn file(&self) -> Option<&FileHandle> {
        self.file.as_ref()
    }

    pub fn take_file(&mut self) -> Option<FileHandle> {
        self.file.take()
    }
}

pub trait ExtensionMethod: Send + Sync {
    fn invoke(&self, ctx: ExtensionContext, params: ParameterList) -> Invocation;
}

pub struct ExtensionFn<F> {
    f: F,
}

/// Wraps an async closure as an [`ExtensionMethod`].
pub fn extension_fn<F, Fut>(f: F) -> ExtensionFn<F>
where
    F: Fn(ExtensionContext, ParameterList) -> Fut + Send + Sync,
    Fut: Future<Output = CallResult> + Send + 'static,
{
    ExtensionFn { f }
}

impl<F, Fut> ExtensionMethod for ExtensionFn<F>
where
    F: Fn(ExtensionContext, ParameterList) -> Fut + Send + Sync,
    Fut: Future<Output = CallResult> + Send + 'static,
{
    fn invoke(&self, ctx: ExtensionContext, params: ParameterList) -> Invocation {
        Invocation::Deferred(Box::pin((self.f)(ctx, params)))
    }
}

impl<F> fmt::Debug for ExtensionFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionFn").finish_non_exhaustive()
    }
}

/// A named table of override methods.
pub struct ExtensionSet {
    name: String,
    methods: HashMap<String, Arc<dyn ExtensionMethod>>,
}

impl ExtensionSet {
    pub fn builder(name: impl Into<String>) -> ExtensionSetBuilder {
        ExtensionSetBuilder { name: name.into(), methods: HashMap::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn method(&self, name: &str) -> Option<&Arc<dyn ExtensionMethod>> {
        self.methods.get(name)
    }

    pub fn method_names(&self) -> Vec<&str> {
        let mut names = self.methods.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionSet").field("name", &self.name).field("methods", &self.method_names()).finish()
    }
}

pub struct ExtensionSetBuilder {
    name: String,
    methods: HashMap<String, Arc<dyn ExtensionMethod>>,
}

impl ExtensionSetBuilder {
    pub fn method<M: ExtensionMethod + 'static>(mut self, name: impl Into<String>, method: M) -> Self {
        self.methods.insert(name.into(), Arc::new(method));
        self
    }

    pub fn build(self) -> ExtensionSet {
        ExtensionSet { name: self.name, methods: self.methods }
    }
}

impl fmt::Debug for ExtensionSetBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionSetBuilder").field("name", &self.name).finish_non_exhaustive()
    }
}
