// API error module
// Every failure a handler can produce, mapped to a status and JSON body

use hyper::StatusCode;

use super::response::{error_response, ApiResponse};
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body missing, unparsable, or not the expected JSON shape
    #[error("invalid json")]
    InvalidJson,
    /// Connect body parsed but carried no usable identifier
    #[error("no server_id provided")]
    MissingServerId,
    /// No server record matched the requested identifier
    #[error("not found")]
    NotFound,
    /// Declared or streamed body exceeds `http.max_body_size`
    #[error("payload too large")]
    PayloadTooLarge,
    /// Document could not be persisted
    #[error("could not write config")]
    StorageWrite(#[source] StoreError),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson | Self::MissingServerId => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::StorageWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> ApiResponse {
        error_response(self.status(), &self.to_string())
    }
}

pub type ApiResult = Result<ApiResponse, ApiError>;
