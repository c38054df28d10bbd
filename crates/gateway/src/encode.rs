//! Rendering the final page.
//!
//! Envelopes are pretty printed with four space indentation. Slashes and non-ASCII
//! characters are written as they are, and the body always ends with a newline.

use crate::body::ResponseBody;
use crate::page::{ErrorEntry, Page, PageParts};
use crate::reply::Reply;
use bytes::{BufMut, BytesMut};
use http::header::{CONTENT_TYPE, HeaderValue};
use http::Response;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// The json body of every non pass-through response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub errors: Vec<ErrorEntry>,
    pub response: Value,
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("failed to serialize envelope: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Envelope {
    /// Serializes the envelope followed by a newline.
    pub fn to_bytes(&self) -> Result<BytesMut, EncodeError> {
        let mut writer = BytesMut::with_capacity(256).writer();
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;

        let mut bytes = writer.into_inner();
        bytes.put_u8(b'\n');
        Ok(bytes)
    }
}

/// Turns the page into the HTTP response.
///
/// A [`Reply::Response`] is returned untouched, status and headers included. Anything
/// else becomes an [`Envelope`] sent with the page's status and headers.
pub fn encode(page: Page) -> Result<Response<ResponseBody>, EncodeError> {
    let PageParts { headers, success, errors, code, response } = page.into_parts();

    let response = match response {
        Some(Reply::Response(response)) => return Ok(response),
        Some(Reply::Value(value)) => value,
        Some(Reply::Opaque(_)) | None => Value::Null,
    };

    let envelope = Envelope { success: success || errors.is_empty(), errors, response };
    let body = envelope.to_bytes()?.freeze();

    let mut response = Response::new(ResponseBody::once(body));
    *response.status_mut() = code;
    *response.headers_mut() = headers;
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    Ok(response)
}
