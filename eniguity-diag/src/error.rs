//! Error types for eniguity-diag
//!
//! Every error renders as `{"detail": ..., "error": {"code": ..., "message": ...}}`.
//! `detail` carries the human-readable message existing clients display.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::IngestError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Filename extension not accepted (400)
    #[error("Unsupported audio format. Please upload WAV, MP3, M4A, or OGG files.")]
    UnsupportedFormat,

    /// Upload could not be decoded as audio (400)
    #[error("Audio processing failed. Please ensure you uploaded a valid audio file: {0}")]
    DecodeFailed(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// eniguity-common error
    #[error("Common error: {0}")]
    Common(#[from] eniguity_common::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedFormat | ApiError::DecodeFailed(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ApiError::DecodeFailed(_) => "DECODE_FAILED",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Internal(_) | ApiError::Other(_) => "INTERNAL_ERROR",
            ApiError::Io(_) => "IO_ERROR",
            ApiError::Common(eniguity_common::Error::Database(_)) => "DATABASE_ERROR",
            ApiError::Common(eniguity_common::Error::Io(_)) => "IO_ERROR",
            ApiError::Common(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::UnsupportedFormat(_) => ApiError::UnsupportedFormat,
            IngestError::Io(e) => ApiError::Io(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(code, error = %message, "Request failed");
        } else {
            tracing::warn!(code, error = %message, "Request rejected");
        }

        let body = Json(json!({
            "detail": message,
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
