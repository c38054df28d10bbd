//! Session-keyed client selection.

use crate::client::ApiClient;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Hands out the client a request is dispatched against.
///
/// `session` is the name captured by the route, `None` when the route has no session
/// segment. Returning `None` means the session is unknown.
#[async_trait]
pub trait ClientPool: Send + Sync {
    async fn client(&self, session: Option<&str>) -> Option<Arc<ApiClient>>;
}

/// A fixed set of clients built at startup.
///
/// Requests without a session use the default client; when no default was given and
/// exactly one session exists, that session serves them instead.
#[derive(Debug, Default)]
pub struct StaticPool {
    default: Option<Arc<ApiClient>>,
    sessions: HashMap<String, Arc<ApiClient>>,
}

impl StaticPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(client: ApiClient) -> Self {
        Self { default: Some(Arc::new(client)), sessions: HashMap::new() }
    }

    #[must_use]
    pub fn session(mut self, name: impl Into<String>, client: ApiClient) -> Self {
        self.sessions.insert(name.into(), Arc::new(client));
        self
    }

    /// Sorted names of the registered sessions.
    pub fn session_names(&self) -> Vec<&str> {
        let mut names = self.sessions.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    fn lookup(&self, session: Option<&str>) -> Option<&Arc<ApiClient>> {
        match session {
            Some(name) => self.sessions.get(name),
            None if self.default.is_some() => self.default.as_ref(),
            None if self.sessions.len() == 1 => self.sessions.values().next(),
            None => None,
        }
    }
}

#[async_trait]
impl ClientPool for StaticPool {
    async fn client(&self, session: Option<&str>) -> Option<Arc<ApiClient>> {
        self.lookup(session).map(Arc::clone)
    }
}
