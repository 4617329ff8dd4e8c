//! Response format negotiation.

use axum::http::{HeaderMap, header};

/// Returns true when the client asked for JSON.
///
/// JSON is chosen by `?format=json`, or by an `Accept` header that names
/// `application/json` without also naming `text/html`. Everything else,
/// browsers included, gets HTML.
pub fn wants_json(format: Option<&str>, headers: &HeaderMap) -> bool {
    if format == Some("json") {
        return true;
    }

    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json") && !accept.contains("text/html"))
}
