//! In-memory client and extensions served by the binary.

use http::header::CONTENT_TYPE;
use http::{Response, StatusCode};
use micro_gateway::{
    ApiClient, CallFailure, ExtensionContext, ExtensionSet, Namespace, ParameterList, Reply, ResponseBody, StaticPool,
    extension_fn, method_fn, sync_fn,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SESSIONS: [&str; 2] = ["alice", "bob"];

pub fn client(username: &str) -> ApiClient {
    let username = username.to_owned();
    let next_id = Arc::new(AtomicU64::new(1));

    let messages = Namespace::builder()
        .method(
            "sendMessage",
            sync_fn(move |params: ParameterList| {
                let peer = params.str(0).ok_or_else(|| CallFailure::new("PEER_ID_INVALID").with_code(400))?;
                let id = next_id.fetch_add(1, Ordering::Relaxed);
                Ok(Reply::from(json!({"id": id, "peer": peer, "message": params.get(1)})))
            }),
        )
        .method(
            "getHistory",
            method_fn(|params: ParameterList| async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(Reply::from(json!({"peer": params.get(0), "messages": []})))
            }),
        )
        .build();

    let privacy = Namespace::builder()
        .method("getSettings", sync_fn(|_| Ok(Reply::from(json!({"phone": "nobody", "lastSeen": "contacts"})))))
        .build();

    let self_name = username.clone();
    Namespace::builder()
        .method("getSelf", sync_fn(move |_| Ok(Reply::from(json!({"id": 1, "username": self_name})))))
        .method(
            "resolveUsername",
            sync_fn(move |params: ParameterList| match params.str(0) {
                Some(name) if name == username => Ok(Reply::from(json!({"id": 1}))),
                _ => Err(CallFailure::notice("USERNAME_NOT_OCCUPIED").with_code(404)),
            }),
        )
        .namespace("messages", messages)
        .namespace("account", Namespace::builder().namespace("privacy", privacy).build())
        .build()
}

pub fn pool() -> StaticPool {
    SESSIONS.iter().fold(StaticPool::with_default(client("gateway")), |pool, name| pool.session(*name, client(name)))
}

/// Overrides reachable from `/api/...`.
pub fn api_extension() -> ExtensionSet {
    ExtensionSet::builder("api")
        .method("ping", extension_fn(|_, _| async { Ok(Reply::from(json!("pong"))) }))
        .method(
            "requestInfo",
            extension_fn(|ctx: ExtensionContext, params: ParameterList| async move {
                let request = ctx.request();
                Ok(Reply::from(json!({
                    "method": request.method().as_str(),
                    "path": request.uri().path(),
                    "query": request.query(),
                    "params": params.into_inner(),
                })))
            }),
        )
        .method(
            "echoFile",
            extension_fn(|mut ctx: ExtensionContext, _| async move {
                let file = ctx.take_file().ok_or_else(|| CallFailure::notice("no file uploaded").with_code(400))?;
                let content_type = file.content_type().unwrap_or("application/octet-stream").to_owned();

                Response::builder()
                    .status(StatusCode::OK)
                    .header(CONTENT_TYPE, content_type)
                    .header("x-file-name", file.file_name())
                    .body(ResponseBody::from(file.into_data()))
                    .map(Reply::from)
                    .map_err(CallFailure::new)
            }),
        )
        .build()
}

/// Methods reachable from `/system/...`.
pub fn system_extension() -> ExtensionSet {
    ExtensionSet::builder("system")
        .method("getVersion", extension_fn(|_, _| async { Ok(Reply::from(json!(VERSION))) }))
        .method("getSessionList", extension_fn(|_, _| async { Ok(Reply::from(json!(SESSIONS))) }))
        .build()
}
