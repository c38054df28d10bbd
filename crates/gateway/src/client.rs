//! The client object graph methods are dispatched against.
//!
//! A client is a tree of named members: methods at the leaves, namespaces in between.
//! Paths reach at most three levels deep, `getSelf`, `messages.send` or
//! `channels.admin.ban`.
//!
//! ```
//! use micro_gateway::{method_fn, sync_fn, ApiPath, Namespace, Reply};
//! use serde_json::json;
//!
//! let client = Namespace::builder()
//!     .method("ping", sync_fn(|_params| Ok(Reply::from(json!("pong")))))
//!     .namespace(
//!         "messages",
//!         Namespace::builder()
//!             .method("send", method_fn(|params| async move { Ok(Reply::from(json!(params.len()))) }))
//!             .build(),
//!     )
//!     .build();
//!
//! assert!(client.resolve(&ApiPath::parse_dotted("messages.send").unwrap()).is_ok());
//! assert!(client.resolve(&ApiPath::parse_dotted("messages").unwrap()).is_err());
//! ```

use crate::error::DispatchError;
use crate::params::ParameterList;
use crate::path::ApiPath;
use crate::reply::{CallResult, Invocation};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A callable member of a client.
#[cfg_attr(test, mockall::automock)]
pub trait ApiMethod: Send + Sync {
    fn invoke(&self, params: ParameterList) -> Invocation;
}

/// An async closure used as an [`ApiMethod`]; every call is deferred.
pub struct MethodFn<F> {
    f: F,
}

pub fn method_fn<F, Fut>(f: F) -> MethodFn<F>
where
    F: Fn(ParameterList) -> Fut + Send + Sync,
    Fut: Future<Output = CallResult> + Send + 'static,
{
    MethodFn { f }
}

impl<F, Fut> ApiMethod for MethodFn<F>
where
    F: Fn(ParameterList) -> Fut + Send + Sync,
    Fut: Future<Output = CallResult> + Send + 'static,
{
    fn invoke(&self, params: ParameterList) -> Invocation {
        Invocation::Deferred(Box::pin((self.f)(params)))
    }
}

/// A plain closure used as an [`ApiMethod`]; every call is ready immediately.
pub struct SyncFn<F> {
    f: F,
}

pub fn sync_fn<F>(f: F) -> SyncFn<F>
where
    F: Fn(ParameterList) -> CallResult + Send + Sync,
{
    SyncFn { f }
}

impl<F> ApiMethod for SyncFn<F>
where
    F: Fn(ParameterList) -> CallResult + Send + Sync,
{
    fn invoke(&self, params: ParameterList) -> Invocation {
        Invocation::Ready((self.f)(params))
    }
}

impl<F> fmt::Debug for MethodFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodFn").finish_non_exhaustive()
    }
}

impl<F> fmt::Debug for SyncFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncFn").finish_non_exhaustive()
    }
}

pub enum Member {
    Method(Arc<dyn ApiMethod>),
    Namespace(Namespace),
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(_) => f.write_str("Method"),
            Self::Namespace(namespace) => namespace.fmt(f),
        }
    }
}

/// A named table of members. The root namespace is the client itself.
#[derive(Default)]
pub struct Namespace {
    members: HashMap<String, Member>,
}

/// The underlying client: its root namespace.
pub type ApiClient = Namespace;

impl Namespace {
    pub fn builder() -> NamespaceBuilder {
        NamespaceBuilder::new()
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    pub fn method(&self, name: &str) -> Option<&Arc<dyn ApiMethod>> {
        match self.members.get(name)? {
            Member::Method(method) => Some(method),
            Member::Namespace(_) => None,
        }
    }

    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        match self.members.get(name)? {
            Member::Namespace(namespace) => Some(namespace),
            Member::Method(_) => None,
        }
    }

    /// Walks the path through nested namespaces down to a method.
    pub fn resolve(&self, path: &ApiPath) -> Result<&Arc<dyn ApiMethod>, DispatchError> {
        let found = match path.segments() {
            [method] => self.method(method),
            [outer, method] => self.namespace(outer).and_then(|ns| ns.method(method)),
            [outer, inner, method] => {
                self.namespace(outer).and_then(|ns| ns.namespace(inner)).and_then(|ns| ns.method(method))
            }
            segments => return Err(DispatchError::PathLength { len: segments.len() }),
        };

        found.ok_or_else(|| DispatchError::unknown_member(path))
    }

    /// Sorted member names of this level.
    pub fn member_names(&self) -> Vec<&str> {
        let mut names = self.members.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.member_names().into_iter().map(|name| (name, &self.members[name]))).finish()
    }
}

#[derive(Default)]
pub struct NamespaceBuilder {
    members: HashMap<String, Member>,
}

impl NamespaceBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn method<M: ApiMethod + 'static>(mut self, name: impl Into<String>, method: M) -> Self {
        self.members.insert(name.into(), Member::Method(Arc::new(method)));
        self
    }

    pub fn namespace(mut self, name: impl Into<String>, namespace: Namespace) -> Self {
        self.members.insert(name.into(), Member::Namespace(namespace));
        self
    }

    pub fn build(self) -> Namespace {
        Namespace { members: self.members }
    }
}

impl fmt::Debug for NamespaceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceBuilder").field("members", &self.members.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::Reply;
    use serde_json::json;

    fn reply(value: &'static str) -> impl ApiMethod {
        sync_fn(move |_| Ok(Reply::from(json!(value))))
    }

    fn client() -> ApiClient {
        Namespace::builder()
            .method("getSelf", reply("self"))
            .namespace("messages", Namespace::builder().method("send", reply("sent")).build())
            .namespace(
                "channels",
                Namespace::builder()
                    .namespace("admin", Namespace::builder().method("ban", reply("banned")).build())
                    .build(),
            )
            .build()
    }

    fn settle_ready(method: &Arc<dyn ApiMethod>) -> serde_json::Value {
        match method.invoke(ParameterList::empty()) {
            Invocation::Ready(Ok(Reply::Value(value))) => value,
            other => panic!("unexpected invocation {other:?}"),
        }
    }

    #[test]
    fn test_resolve_each_depth() {
        let client = client();
        for (path, expected) in [("getSelf", "self"), ("messages.send", "sent"), ("channels.admin.ban", "banned")] {
            let method = client.resolve(&ApiPath::parse_dotted(path).unwrap()).unwrap();
            assert_eq!(settle_ready(method), json!(expected));
        }
    }

    #[test]
    fn test_resolve_unknown_member() {
        let client = client();
        for path in ["missing", "messages", "messages.missing", "getSelf.x", "channels.admin", "channels.admin.ban"] {
            let result = client.resolve(&ApiPath::parse_dotted(path).unwrap());
            if path == "channels.admin.ban" {
                assert!(result.is_ok());
            } else {
                assert_eq!(result.err(), Some(DispatchError::unknown_member(path)), "path {path}");
            }
        }
    }

    #[tokio::test]
    async fn test_method_fn_is_deferred() {
        let method = method_fn(|params: ParameterList| async move { Ok(Reply::from(json!(params.len()))) });

        let Invocation::Deferred(future) = method.invoke(ParameterList::from(vec![json!(1), json!(2)])) else {
            panic!("expected a deferred invocation");
        };
        match future.await {
            Ok(Reply::Value(value)) => assert_eq!(value, json!(2)),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_member_names() {
        assert_eq!(client().member_names(), vec!["channels", "getSelf", "messages"]);
    }
}
