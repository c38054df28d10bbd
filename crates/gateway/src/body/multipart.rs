//! Streaming `multipart/form-data` reader.
//!
//! The body is pulled frame by frame. Plain fields are buffered into the field list in
//! encounter order; the first part that carries a `filename` becomes the request's
//! [`FileHandle`] and reading stops right after it, so later parts (including any
//! second file) are never consumed.

use crate::body::{read_error, FileHandle, ParsedBody};
use crate::error::ParseError;
use bytes::{Buf, Bytes, BytesMut};
use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::error::Error;

type BoxError = Box<dyn Error + Send + Sync>;

pub(crate) async fn parse_multipart<B>(body: B, boundary: &str, limit: usize) -> Result<ParsedBody, ParseError>
where
    B: HttpBody<Data = Bytes> + Unpin,
    B::Error: Into<BoxError>,
{
    let opening = format!("--{boundary}");
    let separator = format!("\r\n--{boundary}");
    let mut reader = PartReader::new(body, limit);

    if reader.read_until(opening.as_bytes()).await?.is_none() {
        return Err(ParseError::invalid_multipart("missing opening boundary"));
    }

    let mut fields = vec![];
    loop {
        // right after a boundary: `--` closes the body, otherwise a CRLF opens the next part
        if reader.starts_with(b"--").await? || reader.at_end().await? {
            return Ok(ParsedBody { fields, file: None });
        }
        reader.skip_prefix(b"\r\n").await?;

        let head = if reader.skip_prefix(b"\r\n").await? {
            PartHead::default()
        } else {
            let raw = reader
                .read_until(b"\r\n\r\n")
                .await?
                .ok_or_else(|| ParseError::invalid_multipart("unterminated part headers"))?;
            PartHead::parse(&raw)
        };

        let content = reader
            .read_until(separator.as_bytes())
            .await?
            .ok_or_else(|| ParseError::invalid_multipart("unterminated part"))?;

        match head.file_name {
            Some(file_name) => {
                let field_name = head.name.unwrap_or_default();
                let file = FileHandle::new(field_name, file_name, head.content_type, content);
                return Ok(ParsedBody { fields, file: Some(file) });
            }
            None => {
                if let Some(name) = head.name {
                    fields.push((name, Value::String(String::from_utf8_lossy(&content).into_owned())));
                }
            }
        }
    }
}

/// Headers of a single part that matter to the parser.
#[derive(Debug, Default, PartialEq, Eq)]
struct PartHead {
    name: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
}

impl PartHead {
    fn parse(raw: &[u8]) -> Self {
        let raw = String::from_utf8_lossy(raw);
        let mut head = Self::default();

        for line in raw.split("\r\n") {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();

            if key.eq_ignore_ascii_case("content-disposition") {
                let mut extended_name = None;
                for (param_name, param_value) in disposition_params(value) {
                    match param_name.to_ascii_lowercase().as_str() {
                        "name" => head.name = Some(param_value),
                        "filename" => head.file_name = Some(param_value),
                        "filename*" => extended_name = Some(decode_extended(&param_value)),
                        _ => {}
                    }
                }
                // `filename*` takes precedence over the plain form
                if extended_name.is_some() {
                    head.file_name = extended_name;
                }
            } else if key.eq_ignore_ascii_case("content-type") {
                head.content_type = Some(value.trim().to_owned());
            }
        }

        head
    }
}

/// Splits the `key=value` parameters after the disposition type.
///
/// Quoted values may contain `;` and `\"`-escaped characters.
fn disposition_params(value: &str) -> Vec<(String, String)> {
    let mut params = vec![];
    let mut chars = value.chars().peekable();

    // disposition type
    for c in chars.by_ref() {
        if c == ';' {
            break;
        }
    }

    while chars.peek().is_some() {
        let mut name = String::new();
        let mut has_value = false;
        for c in chars.by_ref() {
            match c {
                '=' => {
                    has_value = true;
                    break;
                }
                ';' => break,
                _ => name.push(c),
            }
        }

        let mut param_value = String::new();
        if has_value {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.next_if_eq(&'"').is_some() {
                while let Some(c) = chars.next() {
                    match c {
                        '"' => break,
                        '\\' => param_value.extend(chars.next()),
                        _ => param_value.push(c),
                    }
                }
                for c in chars.by_ref() {
                    if c == ';' {
                        break;
                    }
                }
            } else {
                for c in chars.by_ref() {
                    if c == ';' {
                        break;
                    }
                    param_value.push(c);
                }
                param_value = param_value.trim_end().to_owned();
            }
        }

        let name = name.trim();
        if has_value && !name.is_empty() {
            params.push((name.to_owned(), param_value));
        }
    }

    params
}

/// Decodes an RFC 5987 `charset'language'value`, falling back to the raw text.
fn decode_extended(value: &str) -> String {
    let encoded = value.splitn(3, '\'').nth(2).unwrap_or(value);
    percent_decode_str(encoded).decode_utf8_lossy().into_owned()
}

/// Incremental buffer over a body that only pulls frames when a lookup needs more data.
struct PartReader<B> {
    body: B,
    buf: BytesMut,
    limit: usize,
    finished: bool,
}

impl<B> PartReader<B>
where
    B: HttpBody<Data = Bytes> + Unpin,
    B::Error: Into<BoxError>,
{
    fn new(body: B, limit: usize) -> Self {
        Self { body, buf: BytesMut::new(), limit, finished: false }
    }

    /// Appends the next non-empty data frame, returns `false` once the body is drained.
    async fn fill(&mut self) -> Result<bool, ParseError> {
        while !self.finished {
            match self.body.frame().await {
                Some(Ok(frame)) => {
                    if let Ok(data) = frame.into_data()
                        && !data.is_empty()
                    {
                        self.buf.extend_from_slice(&data);
                        return Ok(true);
                    }
                }
                Some(Err(e)) => return Err(read_error(e.into(), self.limit)),
                None => self.finished = true,
            }
        }
        Ok(false)
    }

    async fn ensure(&mut self, len: usize) -> Result<bool, ParseError> {
        while self.buf.len() < len {
            if !self.fill().await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn at_end(&mut self) -> Result<bool, ParseError> {
        Ok(!self.ensure(1).await?)
    }

    async fn starts_with(&mut self, prefix: &[u8]) -> Result<bool, ParseError> {
        self.ensure(prefix.len()).await?;
        Ok(self.buf.starts_with(prefix))
    }

    async fn skip_prefix(&mut self, prefix: &[u8]) -> Result<bool, ParseError> {
        if self.starts_with(prefix).await? {
            self.buf.advance(prefix.len());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Returns everything before `needle` and consumes the needle itself.
    ///
    /// `None` means the body ended before the needle showed up.
    async fn read_until(&mut self, needle: &[u8]) -> Result<Option<Bytes>, ParseError> {
        let mut searched = 0;
        loop {
            if let Some(pos) = find(&self.buf[searched..], needle) {
                let chunk = self.buf.split_to(searched + pos).freeze();
                self.buf.advance(needle.len());
                return Ok(Some(chunk));
            }
            // a needle may straddle two frames
            searched = self.buf.len().saturating_sub(needle.len() - 1);

            if !self.fill().await? {
                return Ok(None);
            }
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}
