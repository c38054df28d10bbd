use crate::error::GatewayError;
use crate::page::{ErrorEntry, Page};
use http::StatusCode;
use tracing::{info, warn};

/// The HTTP status a failure code maps to: client error codes as they are, anything
/// else (unset included) as `400 Bad Request`.
pub fn status_for(code: u16) -> StatusCode {
    if (400..500).contains(&code) {
        StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
    } else {
        StatusCode::BAD_REQUEST
    }
}

/// Records `error` on the page and moves the status, unless a previous failure already
/// set one.
pub fn classify(page: Page, error: &GatewayError) -> Page {
    let status = status_for(error.code());

    if error.is_notice() {
        info!(code = status.as_u16(), "{error}");
    } else {
        warn!(code = status.as_u16(), kind = error.kind_name(), "request failed: {error:?}");
    }

    page.with_code(status).with_error(ErrorEntry::from(error))
}
