//! HTTP surface of the gateway: routes, hyper service, configuration and the accept loop.
//!
//! ```no_run
//! use micro_gateway::{DottedPathResolver, Gateway, Namespace, Reply, StaticPool, sync_fn};
//! use micro_gateway_server::router::{get, post};
//! use micro_gateway_server::{Router, Server};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Namespace::builder().method("ping", sync_fn(|_| Ok(Reply::null()))).build();
//! let gateway = Gateway::new(Arc::new(StaticPool::with_default(client)));
//!
//! let router = Router::builder()
//!     .route("/api/{method}", get(DottedPathResolver::new()))
//!     .route("/api/{method}", post(DottedPathResolver::new()))
//!     .build()?;
//!
//! Server::builder().router(router).gateway(gateway).address("127.0.0.1:9503").build()?.start().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod request;
mod server;
mod service;

pub mod logging;
pub mod router;

pub use config::DEFAULT_LISTEN;
pub use config::DEFAULT_LOG_LEVEL;
pub use config::GatewayConfig;
pub use request::PathParams;
pub use request::RouteContext;
pub use router::Router;
pub use router::RouterError;
pub use server::BoundServer;
pub use server::Server;
pub use server::ServerBuildError;
pub use server::ServerBuilder;
pub use server::ServerError;
pub use service::GatewayService;
pub use service::process_request;
