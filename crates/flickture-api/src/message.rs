//! User-facing text for failed requests.
//!
//! Precedence for a received error response: the body's `detail` field, then
//! its `message` field, then a plain-text body, then a canned message for the
//! status code.

use serde_json::{Map, Value};

use crate::error::TransportErrorKind;

pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";
pub const SERVER_ERROR_MESSAGE: &str = "An internal server error occurred. Please try again later.";
pub const UNAUTHORIZED_MESSAGE: &str = "Your session has expired. Please log in again.";
pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please check your connection and try again.";
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";

/// Message for a failure where no response was received.
pub fn transport_message(kind: TransportErrorKind) -> &'static str {
    match kind {
        TransportErrorKind::Timeout => TIMEOUT_MESSAGE,
        TransportErrorKind::Connect | TransportErrorKind::Other => NETWORK_MESSAGE,
    }
}

/// Message for a received error response.
pub fn status_message(status: u16, body: &str) -> String {
    message_from_body(body).unwrap_or_else(|| canned_status_message(status))
}

pub fn canned_status_message(status: u16) -> String {
    match status {
        401 => UNAUTHORIZED_MESSAGE.to_string(),
        404 => NOT_FOUND_MESSAGE.to_string(),
        500 => SERVER_ERROR_MESSAGE.to_string(),
        _ => format!("Request failed with status {status}."),
    }
}

fn message_from_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => text_field(&map, "detail").or_else(|| text_field(&map, "message")),
        Ok(Value::String(s)) => non_empty(&s),
        Ok(_) => None,
        // HTML error pages are not worth showing verbatim.
        Err(_) if trimmed.starts_with('<') => None,
        Err(_) => Some(trimmed.to_string()),
    }
}

fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).and_then(non_empty)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_wins_over_message() {
        let body = r#"{"message": "generic", "detail": "Not allowed to edit this list."}"#;
        assert_eq!(status_message(403, body), "Not allowed to edit this list.");
    }

    #[test]
    fn test_message_field_used_without_detail() {
        let body = r#"{"message": "Movie already in watchlist"}"#;
        assert_eq!(status_message(400, body), "Movie already in watchlist");
    }

    #[test]
    fn test_blank_detail_falls_through_to_message() {
        let body = r#"{"detail": "  ", "message": "fallback"}"#;
        assert_eq!(status_message(400, body), "fallback");
    }

    #[test]
    fn test_raw_string_body() {
        assert_eq!(status_message(502, "Bad gateway upstream"), "Bad gateway upstream");
        assert_eq!(status_message(400, r#""quoted reason""#), "quoted reason");
    }

    #[test]
    fn test_canned_messages_for_empty_body() {
        assert_eq!(status_message(404, ""), NOT_FOUND_MESSAGE);
        assert_eq!(status_message(500, ""), SERVER_ERROR_MESSAGE);
        assert_eq!(status_message(418, ""), "Request failed with status 418.");
    }

    #[test]
    fn test_object_without_known_fields_uses_canned() {
        let body = r#"{"email": ["This field is required."]}"#;
        assert_eq!(status_message(404, body), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_html_body_uses_canned() {
        assert_eq!(
            status_message(500, "<!DOCTYPE html><html>Server Error</html>"),
            SERVER_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_transport_messages() {
        assert_eq!(transport_message(TransportErrorKind::Timeout), TIMEOUT_MESSAGE);
        assert_eq!(transport_message(TransportErrorKind::Connect), NETWORK_MESSAGE);
    }
}
