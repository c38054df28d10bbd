//! Choosing and invoking the callable for a path.

use crate::body::FileHandle;
use crate::client::ApiClient;
use crate::error::DispatchError;
use crate::extension::{ExtensionContext, ExtensionSet};
use crate::params::ParameterList;
use crate::path::ApiPath;
use crate::reply::Invocation;
use crate::request::RequestContext;
use std::sync::Arc;
use tracing::debug;

/// Invokes methods against one client, with an optional override table in front.
///
/// A single-segment path whose name the extension set declares always goes to the
/// extension, even when the client has a member of the same name. Every other path is
/// walked through the client's namespaces. Overrides never apply to nested paths.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    client: &'a Arc<ApiClient>,
    extension: Option<&'a ExtensionSet>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(client: &'a Arc<ApiClient>, extension: Option<&'a ExtensionSet>) -> Self {
        Self { client, extension }
    }

    /// Finds the callable for `path` and invokes it with `params`.
    ///
    /// The uploaded file only reaches extension methods; client methods get the
    /// positional parameters alone.
    pub fn dispatch(
        &self,
        path: &ApiPath,
        params: ParameterList,
        request: &Arc<RequestContext>,
        file: Option<FileHandle>,
    ) -> Result<Invocation, DispatchError> {
        if let (Some(extension), [name]) = (self.extension, path.segments())
            && let Some(method) = extension.method(name)
        {
            debug!(path = %path, extension = extension.name(), "dispatching to extension override");
            let ctx = ExtensionContext::new(Arc::clone(self.client), Arc::clone(request), file);
            return Ok(method.invoke(ctx, params));
        }

        let method = self.client.resolve(path)?;
        debug!(path = %path, depth = path.len(), "dispatching to client");
        Ok(method.invoke(params))
    }
}
