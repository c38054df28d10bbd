use crate::router::Router;
use crate::service::GatewayService;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use micro_gateway::Gateway;
use std::future::Future;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

pub struct ServerBuilder {
    router: Option<Router>,
    gateway: Option<Gateway>,
    address: Option<io::Result<Vec<SocketAddr>>>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { router: None, gateway: None, address: None }
    }

    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(Iterator::collect));
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    pub fn gateway(mut self, gateway: Gateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        let gateway = self.gateway.ok_or(ServerBuildError::MissingGateway)?;
        let address = self
            .address
            .ok_or(ServerBuildError::MissingAddress)?
            .map_err(|source| ServerBuildError::InvalidAddress { source })?;
        if address.is_empty() {
            return Err(ServerBuildError::InvalidAddress { source: io::Error::other("address resolved to nothing") });
        }

        Ok(Server { service: GatewayService::new(Arc::new(router), Arc::new(gateway)), address })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
    #[error("gateway must be set")]
    MissingGateway,
    #[error("address must be set")]
    MissingAddress,
    #[error("invalid address: {source}")]
    InvalidAddress { source: io::Error },
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {address:?}: {source}")]
    Bind { address: Vec<SocketAddr>, source: io::Error },
    #[error("failed to read local address: {0}")]
    LocalAddr(#[source] io::Error),
}

#[derive(Debug)]
pub struct Server {
    service: GatewayService,
    address: Vec<SocketAddr>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let listener = TcpListener::bind(self.address.as_slice())
            .await
            .map_err(|source| ServerError::Bind { address: self.address.clone(), source })?;
        Ok(BoundServer { listener, service: self.service })
    }

    /// Binds and serves until Ctrl-C, then drains in-flight connections.
    pub async fn start(self) -> Result<(), ServerError> {
        let bound = self.bind().await?;
        info!(addr = %bound.local_addr()?, "listening for connections");

        bound
            .serve(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(error = %e, "failed to listen for shutdown signal");
                }
                info!("received shutdown signal, draining connections");
            })
            .await;
        Ok(())
    }
}

#[derive(Debug)]
pub struct BoundServer {
    listener: TcpListener,
    service: GatewayService,
}

impl BoundServer {
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    /// Runs the accept loop until `shutdown` completes.
    pub async fn serve<S>(self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        let graceful = GracefulShutdown::new();
        let http = HttpConnBuilder::new(TokioExecutor::new());

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    let (stream, peer_addr) = match result {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!(error = %e, "failed to accept connection");
                            continue;
                        }
                    };

                    let conn = http.serve_connection(TokioIo::new(stream), self.service.clone());
                    let conn = graceful.watch(conn.into_owned());

                    tokio::spawn(async move {
                        if let Err(e) = conn.await {
                            error!(peer_addr = %peer_addr, error = %e, "connection error");
                        }
                    });
                }

                () = &mut shutdown => {
                    info!("shutting down gracefully");
                    break;
                }
            }
        }

        graceful.shutdown().await;
        info!("all connections drained");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::get;
    use micro_gateway::{DottedPathResolver, Namespace, Reply, StaticPool, sync_fn};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    fn router() -> Router {
        Router::builder().route("/api/{method}", get(DottedPathResolver::new())).build().unwrap()
    }

    fn gateway() -> Gateway {
        let client = Namespace::builder().method("ping", sync_fn(|_| Ok(Reply::from(json!("pong"))))).build();
        Gateway::new(Arc::new(StaticPool::with_default(client)))
    }

    #[test]
    fn test_build_errors() {
        assert!(matches!(Server::builder().build(), Err(ServerBuildError::MissingRouter)));
        assert!(matches!(Server::builder().router(router()).build(), Err(ServerBuildError::MissingGateway)));
        assert!(matches!(
            Server::builder().router(router()).gateway(gateway()).build(),
            Err(ServerBuildError::MissingAddress)
        ));
        assert!(matches!(
            Server::builder().router(router()).gateway(gateway()).address("not an address").build(),
            Err(ServerBuildError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_serve_and_shutdown() {
        let server = Server::builder().router(router()).gateway(gateway()).address("127.0.0.1:0").build().unwrap();
        let bound = server.bind().await.unwrap();
        let addr = bound.local_addr().unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(bound.serve(async {
            let _ = rx.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET /api/ping HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("application/json; charset=utf-8"));
        assert!(response.contains("\"response\": \"pong\""));

        tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
