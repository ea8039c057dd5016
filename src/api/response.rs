// API response utility functions module

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

pub type ApiResponse = Response<Full<Bytes>>;

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";

/// Compact JSON with a space after `,` and `:` (`{"a": 1, "b": 2}`), the
/// shape existing clients compare against.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize a response body
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// Response builder carrying the cross-origin headers every matched route sends
fn cors_builder(status: StatusCode) -> Builder {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", ALLOW_ORIGIN)
        .header("Access-Control-Allow-Methods", ALLOW_METHODS)
        .header("Access-Control-Allow-Headers", ALLOW_HEADERS)
}

/// Build JSON response
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> ApiResponse {
    let json = match to_json_bytes(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error");
        }
    };

    cors_builder(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .header("Content-Length", json.len())
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// `{"error": "<message>"}` with the given status
pub fn error_response(status: StatusCode, message: &str) -> ApiResponse {
    let body = serde_json::json!({ "error": message });
    let json = to_json_bytes(&body).unwrap_or_default();

    cors_builder(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .header("Content-Length", json.len())
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// CORS headers and an empty body (preflight, 204 on delete)
pub fn empty_response(status: StatusCode) -> ApiResponse {
    cors_builder(status)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Unmatched route: bare 404, no CORS headers, no body
pub fn bare_not_found() -> ApiResponse {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(StatusCode::NOT_FOUND, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header<'a>(resp: &'a ApiResponse, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_spaced_json() {
        let value = json!({"status": "connected", "server_id": "X", "list": [1, 2, {}], "empty": []});
        let text = String::from_utf8(to_json_bytes(&value).unwrap()).unwrap();
        assert_eq!(
            text,
            r#"{"status": "connected", "server_id": "X", "list": [1, 2, {}], "empty": []}"#
        );
    }

    #[test]
    fn test_non_ascii_is_literal() {
        let text = String::from_utf8(to_json_bytes(&json!({"name": "Zürich 東京"})).unwrap()).unwrap();
        assert_eq!(text, r#"{"name": "Zürich 東京"}"#);
    }

    #[test]
    fn test_json_response_headers() {
        let resp = json_response(StatusCode::CREATED, &json!({"id": "ü"}));
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
        assert_eq!(
            header(&resp, "access-control-allow-methods"),
            Some("GET, POST, PUT, DELETE, OPTIONS")
        );
        assert_eq!(header(&resp, "access-control-allow-headers"), Some("Content-Type"));
        assert_eq!(
            header(&resp, "content-type"),
            Some("application/json; charset=utf-8")
        );
        // `{"id": "ü"}` is 12 bytes in UTF-8
        assert_eq!(header(&resp, "content-length"), Some("12"));
    }

    #[test]
    fn test_bare_not_found_has_no_cors() {
        let resp = bare_not_found();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get("access-control-allow-origin").is_none());
        assert!(resp.headers().get("content-type").is_none());
    }

    #[test]
    fn test_empty_response_has_cors() {
        let resp = empty_response(StatusCode::NO_CONTENT);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
    }
}
