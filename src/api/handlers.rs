// Endpoint handlers module
// Session endpoints and server record CRUD over the persisted document

use hyper::body::Bytes;
use hyper::StatusCode;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::response::{empty_response, json_response};
use crate::config::AppState;
use crate::logger;
use crate::store::{ConfigDocument, ServerRecord};

/// Connect body keys, checked in this order
const CONNECT_ID_KEYS: [&str; 3] = ["server_id", "id", "uuid"];

/// Parse a body that must be a JSON object
fn parse_object(body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::InvalidJson),
        Err(e) => {
            logger::log_debug(&format!("Rejected request body: {e}"));
            Err(ApiError::InvalidJson)
        }
    }
}

/// First non-empty string among `server_id`, `id`, `uuid`
fn requested_server_id(payload: &Value) -> Option<String> {
    CONNECT_ID_KEYS.iter().find_map(|key| {
        payload
            .get(key)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(ToString::to_string)
    })
}

/// Persist a record mutation. The request still succeeds when the write
/// fails; only `PUT /api/config` reports storage errors to the client.
fn save_logged(state: &AppState, document: &ConfigDocument) {
    if let Err(e) = state.store.save(document) {
        logger::log_error(&format!("Could not write config: {e}"));
    }
}

pub async fn status(state: &AppState) -> ApiResult {
    let status = state.session.lock().await.status();
    Ok(json_response(StatusCode::OK, &status))
}

/// Traffic counters; `advance` simulates one poll's worth of traffic first
pub async fn stats(state: &AppState, advance: bool) -> ApiResult {
    let stats = {
        let mut session = state.session.lock().await;
        if advance {
            session.observe_traffic()
        } else {
            session.stats()
        }
    };
    Ok(json_response(StatusCode::OK, &stats))
}

pub async fn connect(state: &AppState, body: &Bytes) -> ApiResult {
    // An empty body is an empty request, not malformed JSON
    let payload = if body.is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)?
    };
    let server_id = requested_server_id(&payload).ok_or(ApiError::MissingServerId)?;

    logger::log_info(&format!("[Session] Connected to {server_id}"));
    let status = state.session.lock().await.connect(server_id);
    Ok(json_response(StatusCode::OK, &status))
}

pub async fn disconnect(state: &AppState) -> ApiResult {
    let status = state.session.lock().await.disconnect();
    logger::log_info("[Session] Disconnected");
    Ok(json_response(StatusCode::OK, &status))
}

pub async fn get_config(state: &AppState) -> ApiResult {
    let document = {
        let _guard = state.store.lock().await;
        state.store.load()
    };
    Ok(json_response(StatusCode::OK, &document))
}

/// Replace the whole document verbatim
pub async fn put_config(state: &AppState, body: &Bytes) -> ApiResult {
    let document = serde_json::from_slice(body)
        .ok()
        .and_then(ConfigDocument::from_value)
        .ok_or(ApiError::InvalidJson)?;

    {
        let _guard = state.store.lock().await;
        state.store.save(&document).map_err(|e| {
            logger::log_error(&format!("Could not write config: {e}"));
            ApiError::StorageWrite(e)
        })?;
    }

    logger::log_info("[Store] Config document replaced");
    Ok(json_response(StatusCode::OK, &document))
}

pub async fn list_servers(state: &AppState) -> ApiResult {
    let document = {
        let _guard = state.store.lock().await;
        state.store.load()
    };
    Ok(json_response(StatusCode::OK, document.servers()))
}

pub async fn get_server(state: &AppState, id: &str) -> ApiResult {
    let document = {
        let _guard = state.store.lock().await;
        state.store.load()
    };
    let server = document.find_server(id).ok_or(ApiError::NotFound)?;
    Ok(json_response(StatusCode::OK, server))
}

pub async fn create_server(state: &AppState, body: &Bytes) -> ApiResult {
    let mut record: ServerRecord = parse_object(body)?;
    let needs_id = match record.get("id") {
        None | Some(Value::Null) => true,
        Some(Value::String(id)) => id.is_empty(),
        Some(_) => false,
    };
    if needs_id {
        record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }

    {
        let _guard = state.store.lock().await;
        let mut document = state.store.load();
        document.push_server(record.clone());
        save_logged(state, &document);
    }

    Ok(json_response(StatusCode::CREATED, &record))
}

pub async fn update_server(state: &AppState, id: &str, body: &Bytes) -> ApiResult {
    let record: ServerRecord = parse_object(body)?;

    let stored = {
        let _guard = state.store.lock().await;
        let mut document = state.store.load();
        let stored = document
            .replace_server(id, record)
            .ok_or(ApiError::NotFound)?;
        save_logged(state, &document);
        stored
    };

    Ok(json_response(StatusCode::OK, &stored))
}

pub async fn delete_server(state: &AppState, id: &str) -> ApiResult {
    {
        let _guard = state.store.lock().await;
        let mut document = state.store.load();
        document.remove_server(id).ok_or(ApiError::NotFound)?;
        save_logged(state, &document);
    }

    Ok(empty_response(StatusCode::NO_CONTENT))
}
