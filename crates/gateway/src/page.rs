//! Per-request page state.
//!
//! A [`Page`] is threaded by value through the pipeline: each stage takes the page and
//! hands back an updated one, nothing is shared or mutated in place.

use crate::error::GatewayError;
use crate::reply::Reply;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

/// Structured description of one failure, as rendered in the `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub code: u16,
    pub kind: String,
    pub message: String,
}

impl From<&GatewayError> for ErrorEntry {
    fn from(error: &GatewayError) -> Self {
        Self { code: error.code(), kind: error.kind_name().to_owned(), message: error.to_string() }
    }
}

#[derive(Debug)]
pub struct Page {
    headers: HeaderMap,
    success: bool,
    errors: Vec<ErrorEntry>,
    code: StatusCode,
    response: Option<Reply>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self { headers: HeaderMap::new(), success: false, errors: Vec::new(), code: StatusCode::OK, response: None }
    }

    /// Sets the status unless an earlier step already moved it away from `200`.
    #[must_use]
    pub fn with_code(mut self, code: StatusCode) -> Self {
        if self.code == StatusCode::OK {
            self.code = code;
        }
        self
    }

    #[must_use]
    pub fn with_error(mut self, entry: ErrorEntry) -> Self {
        self.errors.push(entry);
        self
    }

    #[must_use]
    pub fn with_response(mut self, reply: Reply) -> Self {
        self.response = Some(reply);
        self
    }

    #[must_use]
    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn response(&self) -> Option<&Reply> {
        self.response.as_ref()
    }

    pub(crate) fn into_parts(self) -> PageParts {
        PageParts {
            headers: self.headers,
            success: self.success,
            errors: self.errors,
            code: self.code,
            response: self.response,
        }
    }
}

pub(crate) struct PageParts {
    pub headers: HeaderMap,
    pub success: bool,
    pub errors: Vec<ErrorEntry>,
    pub code: StatusCode,
    pub response: Option<Reply>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_code_sticks() {
        let page = Page::new().with_code(StatusCode::NOT_FOUND).with_code(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(page.code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_stages_return_updated_pages() {
        let page = Page::new();
        assert_eq!(page.code(), StatusCode::OK);
        assert!(page.response().is_none());

        let page = page
            .with_header(http::header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .with_response(Reply::from(json!(1)))
            .with_error(ErrorEntry { code: 0, kind: "call_failure".into(), message: "boom".into() });

        assert_eq!(page.headers()[http::header::CACHE_CONTROL], "no-store");
        assert!(matches!(page.response(), Some(Reply::Value(value)) if *value == json!(1)));
        assert_eq!(page.errors().len(), 1);
        assert!(!page.success());
    }
}
