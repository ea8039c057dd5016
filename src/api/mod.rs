// API module entry
// Routes `/api/*` requests to the session and server-record handlers

mod error;
mod handlers;
mod response;

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{header, Method, Request, StatusCode};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};

use error::ApiError;
use response::ApiResponse;

/// Prefix of the single-record routes; the remainder is the record id
const SERVER_PATH_PREFIX: &str = "/api/servers/";

/// Route one request to its handler.
///
/// Every matched route answers with CORS headers; anything unmatched gets a
/// bare 404.
pub async fn dispatch(method: &Method, path: &str, body: &Bytes, state: &AppState) -> ApiResponse {
    let record_id = path.strip_prefix(SERVER_PATH_PREFIX);

    let result = match (method, path, record_id) {
        // CORS preflight for any path
        (&Method::OPTIONS, _, _) => Ok(response::empty_response(StatusCode::OK)),
        // Simulated session
        (&Method::GET | &Method::PUT, "/api/status", _) => handlers::status(state).await,
        (&Method::GET, "/api/stats", _) => handlers::stats(state, true).await,
        (&Method::PUT, "/api/stats", _) => handlers::stats(state, false).await,
        (&Method::POST, "/api/connect", _) => handlers::connect(state, body).await,
        (&Method::POST, "/api/disconnect", _) => handlers::disconnect(state).await,
        // Whole document
        (&Method::GET, "/api/config", _) => handlers::get_config(state).await,
        (&Method::PUT, "/api/config", _) => handlers::put_config(state, body).await,
        // Server collection
        (&Method::GET, "/api/servers", _) => handlers::list_servers(state).await,
        (&Method::POST, "/api/servers", _) => handlers::create_server(state, body).await,
        // Single server record
        (&Method::GET, _, Some(id)) => handlers::get_server(state, id).await,
        (&Method::PUT, _, Some(id)) => handlers::update_server(state, id, body).await,
        (&Method::DELETE, _, Some(id)) => handlers::delete_server(state, id).await,
        // Unknown route
        _ => Ok(response::bare_not_found()),
    };

    result.unwrap_or_else(|err| {
        logger::log_debug(&format!("{method} {path} failed: {err}"));
        err.into_response()
    })
}

/// Routes that read a request body; everything else ignores it.
fn consumes_body(method: &Method, path: &str) -> bool {
    match *method {
        Method::POST => matches!(path, "/api/connect" | "/api/servers"),
        Method::PUT => path == "/api/config" || path.starts_with(SERVER_PATH_PREFIX),
        _ => false,
    }
}

/// hyper service entry: read the body where the route takes one, dispatch,
/// and write the access log.
pub async fn handle_api<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<ApiResponse, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = state.config.logging.access_log.then(|| {
        AccessLogEntry::from_request(&req, peer_addr)
    });

    let (parts, body) = req.into_parts();
    let path = parts.uri.path();
    let max_body_size = state.config.http.max_body_size;

    let response = if consumes_body(&parts.method, path) {
        match read_body(&parts.headers, body, max_body_size).await {
            Ok(bytes) => dispatch(&parts.method, path, &bytes, &state).await,
            Err(err) => err.into_response(),
        }
    } else {
        dispatch(&parts.method, path, &Bytes::new(), &state).await
    };

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Collect the request body, refusing anything over `max_body_size`.
async fn read_body<B>(
    headers: &header::HeaderMap,
    body: B,
    max_body_size: u64,
) -> Result<Bytes, ApiError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    if let Some(size) = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
    {
        if size > max_body_size {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            return Err(ApiError::PayloadTooLarge);
        }
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(ApiError::PayloadTooLarge),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(ApiError::InvalidJson)
        }
    }
}
