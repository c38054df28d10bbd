//! Request body parsing.
//!
//! The declared `Content-Type` picks exactly one decoder:
//!
//! - anything containing `multipart/form-data`: streamed, stops at the first file
//! - anything containing `application/json`: buffered, must be an object or an array
//! - everything else, including a missing header: buffered and urlencoded-decoded
//!
//! The query string is decoded separately and its values are appended after the body
//! values, see [`ParameterList::merge`].

mod file;
mod multipart;
mod response;

pub use file::FileHandle;
pub use response::ResponseBody;

use crate::error::ParseError;
use crate::params::{ParameterList, parse_query, parse_urlencoded};
use bytes::Bytes;
use http::HeaderValue;
use http_body::Body as HttpBody;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use mime::Mime;
use serde_json::Value;
use std::error::Error;
use tracing::trace;

type BoxError = Box<dyn Error + Send + Sync>;

/// Default upper bound for a request body, 10 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Named fields and the optional upload decoded from a body.
#[derive(Debug, Default)]
pub struct ParsedBody {
    pub fields: Vec<(String, Value)>,
    pub file: Option<FileHandle>,
}

/// Everything the dispatcher needs from a request besides its path.
#[derive(Debug, Default)]
pub struct ParsedRequest {
    pub params: ParameterList,
    pub file: Option<FileHandle>,
}

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    UrlEncoded,
    Multipart { boundary: String },
    Json,
}

impl BodyKind {
    fn from_content_type(content_type: Option<&HeaderValue>) -> Result<Self, ParseError> {
        let Some(content_type) = content_type.and_then(|value| value.to_str().ok()) else {
            return Ok(Self::UrlEncoded);
        };
        let lowercase = content_type.to_ascii_lowercase();

        if lowercase.contains("multipart/form-data") {
            let boundary = content_type
                .parse::<Mime>()
                .ok()
                .and_then(|mime| mime.get_param(mime::BOUNDARY).map(|b| b.as_str().trim_matches('"').to_owned()))
                .filter(|boundary| !boundary.is_empty())
                .ok_or_else(|| ParseError::invalid_multipart("missing boundary in content type"))?;
            Ok(Self::Multipart { boundary })
        } else if lowercase.contains(mime::APPLICATION_JSON.essence_str()) {
            Ok(Self::Json)
        } else {
            Ok(Self::UrlEncoded)
        }
    }
}

/// Decodes request bodies under a size limit.
#[derive(Debug, Clone, Copy)]
pub struct BodyParser {
    limit: usize,
}

impl Default for BodyParser {
    fn default() -> Self {
        Self::new(DEFAULT_BODY_LIMIT)
    }
}

impl BodyParser {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Parses the body and the query string into positional parameters and the upload.
    pub async fn parse_request<B>(
        &self,
        content_type: Option<&HeaderValue>,
        query: Option<&str>,
        body: B,
    ) -> Result<ParsedRequest, ParseError>
    where
        B: HttpBody<Data = Bytes> + Unpin,
        B::Error: Into<BoxError>,
    {
        let parsed = self.parse(content_type, body).await?;
        let query = parse_query(query)?;
        trace!(body_fields = parsed.fields.len(), query_fields = query.len(), "parsed request parameters");

        Ok(ParsedRequest { params: ParameterList::merge(parsed.fields, query), file: parsed.file })
    }

    /// Parses the body alone according to its declared content type.
    pub async fn parse<B>(&self, content_type: Option<&HeaderValue>, body: B) -> Result<ParsedBody, ParseError>
    where
        B: HttpBody<Data = Bytes> + Unpin,
        B::Error: Into<BoxError>,
    {
        let body = Limited::new(body, self.limit);

        match BodyKind::from_content_type(content_type)? {
            BodyKind::Multipart { boundary } => multipart::parse_multipart(body, &boundary, self.limit).await,
            BodyKind::Json => {
                let bytes = self.collect(body).await?;
                Ok(ParsedBody { fields: parse_json(&bytes)?, file: None })
            }
            BodyKind::UrlEncoded => {
                let bytes = self.collect(body).await?;
                Ok(ParsedBody { fields: parse_urlencoded(&bytes)?, file: None })
            }
        }
    }

    async fn collect<B>(&self, body: Limited<B>) -> Result<Bytes, ParseError>
    where
        B: HttpBody<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        body.collect().await.map(|collected| collected.to_bytes()).map_err(|e| read_error(e, self.limit))
    }
}

/// Maps a body read failure, telling the size limit apart from transport errors.
pub(crate) fn read_error(e: BoxError, limit: usize) -> ParseError {
    if e.is::<LengthLimitError>() { ParseError::too_large(limit) } else { ParseError::body(e) }
}

fn parse_json(bytes: &[u8]) -> Result<Vec<(String, Value)>, ParseError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(vec![]);
    }

    match serde_json::from_slice::<Value>(bytes).map_err(ParseError::invalid_json)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Array(values) => Ok(values.into_iter().enumerate().map(|(i, value)| (i.to_string(), value)).collect()),
        _ => Err(ParseError::invalid_json("expected an object or an array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{Empty, Full};
    use serde_json::json;

    fn header(value: &'static str) -> HeaderValue {
        HeaderValue::from_static(value)
    }

    #[test]
    fn test_body_kind() {
        assert_eq!(BodyKind::from_content_type(None).unwrap(), BodyKind::UrlEncoded);
        assert_eq!(BodyKind::from_content_type(Some(&header("text/plain"))).unwrap(), BodyKind::UrlEncoded);
        assert_eq!(
            BodyKind::from_content_type(Some(&header("application/x-www-form-urlencoded"))).unwrap(),
            BodyKind::UrlEncoded
        );
        assert_eq!(BodyKind::from_content_type(Some(&header("application/json; charset=utf-8"))).unwrap(), BodyKind::Json);
        assert_eq!(
            BodyKind::from_content_type(Some(&header("multipart/form-data; boundary=\"abc\""))).unwrap(),
            BodyKind::Multipart { boundary: "abc".into() }
        );
        assert!(matches!(
            BodyKind::from_content_type(Some(&header("multipart/form-data"))),
            Err(ParseError::InvalidMultipart { .. })
        ));
    }

    #[tokio::test]
    async fn test_json_object_keeps_member_order() {
        let parser = BodyParser::default();
        let body = Full::new(Bytes::from(r#"{"z": 1, "a": [1, 2], "m": {"k": "v"}}"#));
        let parsed = parser.parse(Some(&header("application/json")), body).await.unwrap();

        let names = parsed.fields.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(parsed.fields[1].1, json!([1, 2]));
    }

    #[tokio::test]
    async fn test_json_array_is_positional() {
        let parser = BodyParser::default();
        let parsed = parser.parse(Some(&header("application/json")), Full::new(Bytes::from("[\"a\", 2]"))).await.unwrap();
        assert_eq!(parsed.fields, vec![("0".to_string(), json!("a")), ("1".to_string(), json!(2))]);
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let parser = BodyParser::default();

        let err = parser.parse(Some(&header("application/json")), Full::new(Bytes::from("{oops"))).await.unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson { .. }));

        let err = parser.parse(Some(&header("application/json")), Full::new(Bytes::from("42"))).await.unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson { .. }));
    }

    #[tokio::test]
    async fn test_empty_json_body() {
        let parser = BodyParser::default();
        let parsed = parser.parse(Some(&header("application/json")), Empty::<Bytes>::new()).await.unwrap();
        assert!(parsed.fields.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_type_falls_back_to_urlencoded() {
        let parser = BodyParser::default();
        let parsed = parser.parse(Some(&header("text/plain")), Full::new(Bytes::from("a=1&b=two"))).await.unwrap();
        assert_eq!(parsed.fields, vec![("a".to_string(), json!("1")), ("b".to_string(), json!("two"))]);
    }

    #[tokio::test]
    async fn test_body_values_precede_query_values() {
        let parser = BodyParser::default();

        let form = parser
            .parse_request(
                Some(&header("application/x-www-form-urlencoded")),
                Some("c=3&d=4"),
                Full::new(Bytes::from("a=1&b=2")),
            )
            .await
            .unwrap();
        assert_eq!(form.params.into_inner(), vec![json!("1"), json!("2"), json!("3"), json!("4")]);

        let json = parser
            .parse_request(Some(&header("application/json")), Some("c=3"), Full::new(Bytes::from(r#"{"b": 2, "a": 1}"#)))
            .await
            .unwrap();
        assert_eq!(json.params.into_inner(), vec![json!(2), json!(1), json!("3")]);
    }

    #[tokio::test]
    async fn test_multipart_request() {
        let parser = BodyParser::default();
        let body = "--B\r\n\
            Content-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n\
            --B\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"f.bin\"\r\n\r\nF\r\n\
            --B\r\n\
            Content-Disposition: form-data; name=\"b\"\r\n\r\n2\r\n\
            --B--\r\n";

        let parsed = parser
            .parse_request(Some(&header("multipart/form-data; boundary=B")), Some("q=9"), Full::new(Bytes::from(body)))
            .await
            .unwrap();

        assert_eq!(parsed.params.into_inner(), vec![json!("1"), json!("9")]);
        assert_eq!(parsed.file.unwrap().data().as_ref(), b"F");
    }

    #[tokio::test]
    async fn test_body_limit() {
        let parser = BodyParser::new(4);

        let err = parser.parse(None, Full::new(Bytes::from("a=12345"))).await.unwrap_err();
        assert!(matches!(err, ParseError::TooLarge { limit: 4 }));

        let err = parser
            .parse(Some(&header("multipart/form-data; boundary=B")), Full::new(Bytes::from("--B\r\n\r\n0123456789")))
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::TooLarge { limit: 4 }));
    }
}
