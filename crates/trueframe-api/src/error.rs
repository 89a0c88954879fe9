//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use trueframe_engine::EngineError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Engine(#[from] EngineError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(EngineError::VideoOpen) => StatusCode::BAD_REQUEST,
            ApiError::Engine(EngineError::EmptyVideo) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Engine(EngineError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) | ApiError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error payload surfaced to callers.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let error = if status == StatusCode::INTERNAL_SERVER_ERROR
            && std::env::var("ENVIRONMENT").unwrap_or_default() == "production"
        {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse { error };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::bad_request("no file").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Engine(EngineError::VideoOpen).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Engine(EngineError::EmptyVideo).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Engine(EngineError::Timeout(120)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_per_request_engine_errors_keep_original_messages() {
        // The caller-facing messages match the service's documented payloads
        assert_eq!(
            ApiError::Engine(EngineError::VideoOpen).to_string(),
            "Cannot open video file. It may be corrupt."
        );
        assert!(ApiError::Engine(EngineError::EmptyVideo)
            .to_string()
            .starts_with("Could not extract any frames"));
    }
}
