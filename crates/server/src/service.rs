//! The hyper service tying the router to the gateway.

use crate::router::Router;
use bytes::Bytes;
use http::{Request, Response};
use http_body::Body as HttpBody;
use hyper::body::Incoming;
use hyper::service::Service;
use micro_gateway::{DispatchError, Gateway, ResponseBody};
use std::convert::Infallible;
use std::error::Error;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug)]
pub struct GatewayService {
    router: Arc<Router>,
    gateway: Arc<Gateway>,
}

impl GatewayService {
    pub fn new(router: Arc<Router>, gateway: Arc<Gateway>) -> Self {
        Self { router, gateway }
    }
}

impl Clone for GatewayService {
    fn clone(&self) -> Self {
        Self { router: Arc::clone(&self.router), gateway: Arc::clone(&self.gateway) }
    }
}

impl Service<Request<Incoming>> for GatewayService {
    type Response = Response<ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let router = Arc::clone(&self.router);
        let gateway = Arc::clone(&self.gateway);

        Box::pin(async move { Ok(process_request(req, &router, &gateway).await) })
    }
}

/// Routes a request and runs it through the gateway.
///
/// A path with no route, or a route with no item accepting the request, is answered
/// with a `404` envelope.
pub async fn process_request<B>(req: Request<B>, router: &Router, gateway: &Gateway) -> Response<ResponseBody>
where
    B: HttpBody<Data = Bytes> + Unpin,
    B::Error: Into<BoxError>,
{
    debug!(method = %req.method(), uri = %req.uri(), "processing request");

    match router.resolve(&req) {
        Some(resolution) => gateway.handle(req, resolution).await,
        None => gateway.reject(DispatchError::route_not_found(req.uri().path()).into()),
    }
}
