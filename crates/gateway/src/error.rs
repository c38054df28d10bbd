//! Error taxonomy of the request pipeline.
//!
//! Every stage returns its own error kind, and [`GatewayError`] unifies them so the
//! classifier has a single input:
//!
//! - [`ParseError`]: the body does not match its declared content type
//! - [`DispatchError`]: the method path cannot be turned into a callable
//! - [`CallFailure`]: the invoked method failed, optionally with an HTTP-range code
//!
//! Each error carries a numeric code, `0` meaning "unset".

use thiserror::Error;

/// Code carried by errors that do not name an HTTP status.
pub const UNSET_CODE: u16 = 0;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid json body: {reason}")]
    InvalidJson { reason: String },

    #[error("invalid form body: {reason}")]
    InvalidForm { reason: String },

    #[error("invalid multipart body: {reason}")]
    InvalidMultipart { reason: String },

    #[error("request body exceeds the limit of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("failed to read request body: {reason}")]
    Body { reason: String },
}

impl ParseError {
    pub fn invalid_json<S: ToString>(str: S) -> Self {
        Self::InvalidJson { reason: str.to_string() }
    }

    pub fn invalid_form<S: ToString>(str: S) -> Self {
        Self::InvalidForm { reason: str.to_string() }
    }

    pub fn invalid_multipart<S: ToString>(str: S) -> Self {
        Self::InvalidMultipart { reason: str.to_string() }
    }

    pub fn too_large(limit: usize) -> Self {
        Self::TooLarge { limit }
    }

    pub fn body<S: ToString>(str: S) -> Self {
        Self::Body { reason: str.to_string() }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::TooLarge { .. } => 413,
            _ => UNSET_CODE,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    #[error("method path must have 1 to 3 segments, got {len}")]
    PathLength { len: usize },

    #[error("method path contains an empty segment")]
    EmptySegment,

    #[error("no callable member at '{path}'")]
    UnknownMember { path: String },

    #[error("session '{name}' not found")]
    UnknownSession { name: String },

    #[error("no route for '{path}'")]
    RouteNotFound { path: String },
}

impl DispatchError {
    pub fn unknown_member<S: ToString>(path: S) -> Self {
        Self::UnknownMember { path: path.to_string() }
    }

    pub fn unknown_session<S: ToString>(name: S) -> Self {
        Self::UnknownSession { name: name.to_string() }
    }

    pub fn route_not_found<S: ToString>(path: S) -> Self {
        Self::RouteNotFound { path: path.to_string() }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::RouteNotFound { .. } => 404,
            _ => UNSET_CODE,
        }
    }
}

/// Severity class of a [`CallFailure`].
///
/// A notice is an expected, user-facing failure: it is logged quietly but classified
/// exactly like an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Error,
    Notice,
}

/// A failure raised by an invoked method.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CallFailure {
    code: u16,
    message: String,
    kind: FailureKind,
}

impl CallFailure {
    pub fn new<S: ToString>(message: S) -> Self {
        Self { code: UNSET_CODE, message: message.to_string(), kind: FailureKind::Error }
    }

    pub fn notice<S: ToString>(message: S) -> Self {
        Self { code: UNSET_CODE, message: message.to_string(), kind: FailureKind::Notice }
    }

    #[must_use]
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}

/// Any failure the pipeline can produce before the response is encoded.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Call(#[from] CallFailure),
}

impl GatewayError {
    /// The numeric code carried by the underlying error, [`UNSET_CODE`] if none.
    pub fn code(&self) -> u16 {
        match self {
            Self::Parse(e) => e.code(),
            Self::Dispatch(e) => e.code(),
            Self::Call(e) => e.code(),
        }
    }

    pub fn is_notice(&self) -> bool {
        matches!(self, Self::Call(e) if e.kind() == FailureKind::Notice)
    }

    /// Stable name used in the `kind` field of an error entry.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse_error",
            Self::Dispatch(_) => "dispatch_error",
            Self::Call(e) if e.kind() == FailureKind::Notice => "notice",
            Self::Call(_) => "call_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ParseError::invalid_json("eof").code(), UNSET_CODE);
        assert_eq!(ParseError::too_large(10).code(), 413);
        assert_eq!(DispatchError::PathLength { len: 4 }.code(), UNSET_CODE);
        assert_eq!(DispatchError::route_not_found("/x").code(), 404);
        assert_eq!(CallFailure::new("boom").code(), UNSET_CODE);
        assert_eq!(CallFailure::new("gone").with_code(410).code(), 410);
    }

    #[test]
    fn test_notice_is_a_call_failure() {
        let notice = GatewayError::from(CallFailure::notice("flood wait"));
        assert!(notice.is_notice());
        assert_eq!(notice.kind_name(), "notice");

        let error = GatewayError::from(CallFailure::new("boom"));
        assert!(!error.is_notice());
        assert_eq!(error.kind_name(), "call_failure");

        assert!(!GatewayError::from(DispatchError::EmptySegment).is_notice());
    }

    #[test]
    fn test_display() {
        assert_eq!(GatewayError::from(CallFailure::new("peer not found")).to_string(), "peer not found");
        assert_eq!(
            GatewayError::from(DispatchError::PathLength { len: 4 }).to_string(),
            "method path must have 1 to 3 segments, got 4"
        );
    }
}
