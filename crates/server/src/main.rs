//! micro-gateway: serves an in-memory demonstration client over HTTP.
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:9503 micro-gateway
//! curl 'http://127.0.0.1:9503/api/messages.sendMessage?peer=bob&message=hi'
//! curl 'http://127.0.0.1:9503/api/alice/getSelf'
//! curl 'http://127.0.0.1:9503/system/getSessionList'
//! ```
//!
//! See [`GatewayConfig`] for the environment variables.

mod demo;

use anyhow::{Context, Result};
use micro_gateway::{BodyParser, DottedPathResolver, Gateway, SinglePathResolver};
use micro_gateway_server::router::{get, post};
use micro_gateway_server::{GatewayConfig, Router, Server, logging};
use std::sync::Arc;
use tracing::info;

fn router() -> Result<Router> {
    let api = Arc::new(demo::api_extension());
    let system = Arc::new(demo::system_extension());

    let router = Router::builder()
        .route("/api/{method}", get(DottedPathResolver::with_extension(Arc::clone(&api))))
        .route("/api/{method}", post(DottedPathResolver::with_extension(Arc::clone(&api))))
        .route("/api/{session}/{method}", get(DottedPathResolver::with_extension(Arc::clone(&api))))
        .route("/api/{session}/{method}", post(DottedPathResolver::with_extension(api)))
        .route("/system/{method}", get(SinglePathResolver::new(Arc::clone(&system))))
        .route("/system/{method}", post(SinglePathResolver::new(system)))
        .build()?;
    Ok(router)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env();
    logging::init(&config.log_level)?;

    info!(
        listen = %config.listen,
        max_body_bytes = config.max_body_bytes,
        sessions = ?demo::SESSIONS,
        "starting micro-gateway",
    );

    let gateway = Gateway::new(Arc::new(demo::pool())).with_parser(BodyParser::new(config.max_body_bytes));
    let addr = config.socket_addr().with_context(|| format!("invalid bind address: {}", config.listen))?;

    Server::builder().router(router()?).gateway(gateway).address(addr).build()?.start().await?;
    Ok(())
}
