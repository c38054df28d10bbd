//! The request pipeline.

use crate::awaiter::settle;
use crate::body::{BodyParser, ParsedRequest, ResponseBody};
use crate::classify::classify;
use crate::dispatch::Dispatcher;
use crate::encode::encode;
use crate::error::{DispatchError, GatewayError};
use crate::page::Page;
use crate::pool::ClientPool;
use crate::reply::Reply;
use crate::request::RequestContext;
use crate::resolver::Resolution;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Request, Response, StatusCode};
use http_body::Body as HttpBody;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tracing::{error, trace};

type BoxError = Box<dyn Error + Send + Sync>;

/// Name reported for a missing default session.
const DEFAULT_SESSION: &str = "default";

/// Runs requests through parse, dispatch, settle and encode.
///
/// Stages run strictly one after the other. The first failing stage ends the request;
/// its error is classified onto the page, which is then encoded like any other.
#[derive(Clone)]
pub struct Gateway {
    pool: Arc<dyn ClientPool>,
    parser: BodyParser,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway").field("parser", &self.parser).finish_non_exhaustive()
    }
}

impl Gateway {
    pub fn new(pool: Arc<dyn ClientPool>) -> Self {
        Self { pool, parser: BodyParser::default() }
    }

    #[must_use]
    pub fn with_parser(mut self, parser: BodyParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn parser(&self) -> &BodyParser {
        &self.parser
    }

    /// Handles a routed request. A failed resolution is reported without reading the body.
    pub async fn handle<B>(&self, request: Request<B>, resolution: Result<Resolution, DispatchError>) -> Response<ResponseBody>
    where
        B: HttpBody<Data = Bytes> + Unpin,
        B::Error: Into<BoxError>,
    {
        let page = match self.run(request, resolution).await {
            Ok(reply) => Page::new().with_response(reply),
            Err(e) => classify(Page::new(), &e),
        };
        render(page)
    }

    /// Renders a failure that happened before the pipeline could start.
    pub fn reject(&self, error: GatewayError) -> Response<ResponseBody> {
        render(classify(Page::new(), &error))
    }

    async fn run<B>(&self, request: Request<B>, resolution: Result<Resolution, DispatchError>) -> Result<Reply, GatewayError>
    where
        B: HttpBody<Data = Bytes> + Unpin,
        B::Error: Into<BoxError>,
    {
        let Resolution { path, extension, session } = resolution?;
        let (parts, body) = request.into_parts();

        let ParsedRequest { params, file } =
            self.parser.parse_request(parts.headers.get(CONTENT_TYPE), parts.uri.query(), body).await?;
        trace!(path = %path, params = params.len(), file = file.is_some(), "request parsed");

        let client = self
            .pool
            .client(session.as_deref())
            .await
            .ok_or_else(|| DispatchError::unknown_session(session.as_deref().unwrap_or(DEFAULT_SESSION)))?;

        let request = Arc::new(RequestContext::new(parts));
        let invocation = Dispatcher::new(&client, extension.as_deref()).dispatch(&path, params, &request, file)?;

        Ok(settle(invocation).await?)
    }
}

fn render(page: Page) -> Response<ResponseBody> {
    match encode(page) {
        Ok(response) => response,
        Err(e) => {
            error!("failed to encode response: {e}");
            let mut response = Response::new(ResponseBody::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}
