//! Turns HTTP requests into method calls on a client object graph.
//!
//! A request travels through a fixed pipeline: the route match is resolved into an
//! [`ApiPath`], the body and query string are decoded into positional parameters, the
//! [`Dispatcher`] picks an extension override or a client member, the invocation is
//! settled and the result, or the first failure, is encoded as a json envelope:
//!
//! ```json
//! {
//!     "success": true,
//!     "errors": [],
//!     "response": "pong"
//! }
//! ```
//!
//! [`Gateway`] runs the whole pipeline; the server crate only wires it to sockets and
//! routes.

mod awaiter;
mod classify;
mod client;
mod dispatch;
mod encode;
mod error;
mod extension;
mod gateway;
mod page;
mod params;
mod path;
mod pool;
mod reply;
mod request;
mod resolver;

pub mod body;

pub use awaiter::settle;
pub use body::BodyParser;
pub use body::FileHandle;
pub use body::ResponseBody;
pub use classify::classify;
pub use classify::status_for;
pub use client::ApiClient;
pub use client::ApiMethod;
pub use client::Member;
pub use client::MethodFn;
pub use client::Namespace;
pub use client::NamespaceBuilder;
pub use client::SyncFn;
pub use client::method_fn;
pub use client::sync_fn;
pub use dispatch::Dispatcher;
pub use encode::EncodeError;
pub use encode::Envelope;
pub use encode::JSON_CONTENT_TYPE;
pub use encode::encode;
pub use error::CallFailure;
pub use error::DispatchError;
pub use error::FailureKind;
pub use error::GatewayError;
pub use error::ParseError;
pub use error::UNSET_CODE;
pub use extension::ExtensionContext;
pub use extension::ExtensionFn;
pub use extension::ExtensionMethod;
pub use extension::ExtensionSet;
pub use extension::ExtensionSetBuilder;
pub use extension::extension_fn;
pub use gateway::Gateway;
pub use page::ErrorEntry;
pub use page::Page;
pub use params::ParameterList;
pub use path::ApiPath;
pub use path::MAX_SEGMENTS;
pub use pool::ClientPool;
pub use pool::StaticPool;
pub use reply::CallResult;
pub use reply::Invocation;
pub use reply::Reply;
pub use request::RequestContext;
pub use resolver::DottedPathResolver;
pub use resolver::METHOD_PARAM;
pub use resolver::PathMatch;
pub use resolver::PathResolver;
pub use resolver::Resolution;
pub use resolver::SESSION_PARAM;
pub use resolver::SinglePathResolver;
