//! What a method call produces.

use crate::body::ResponseBody;
use crate::error::CallFailure;
use futures::future::BoxFuture;
use http::Response;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt;

/// The settled result of a method call.
pub enum Reply {
    /// A json value rendered into the `response` field of the envelope.
    Value(Value),
    /// A fully built response, emitted as-is without an envelope.
    Response(Response<ResponseBody>),
    /// A value that has no json form. The envelope renders it as `null`.
    Opaque(Box<dyn Any + Send>),
}

impl Reply {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// Serializes `value` into a json reply.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, CallFailure> {
        serde_json::to_value(value).map(Self::Value).map_err(CallFailure::new)
    }

    pub fn opaque<T: Any + Send>(value: T) -> Self {
        Self::Opaque(Box::new(value))
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Response(response) => f.debug_tuple("Response").field(&response.status()).finish(),
            Self::Opaque(_) => f.write_str("Opaque"),
        }
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Response<ResponseBody>> for Reply {
    fn from(response: Response<ResponseBody>) -> Self {
        Self::Response(response)
    }
}

pub type CallResult = Result<Reply, CallFailure>;

/// The immediate outcome of invoking a method.
///
/// Synchronous methods answer right away, asynchronous ones hand back a future that
/// the [`settle`](crate::settle) step awaits.
pub enum Invocation {
    Ready(CallResult),
    Deferred(BoxFuture<'static, CallResult>),
}

impl Invocation {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Self::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

impl From<CallResult> for Invocation {
    fn from(result: CallResult) -> Self {
        Self::Ready(result)
    }
}
