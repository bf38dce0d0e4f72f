//! HTTP error mapping.
//!
//! Validation and not-found errors are deliberate and become structured 4xx
//! responses; everything else is an infrastructure failure (500).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use notes_core::NoteServiceError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// API-layer error type.
#[derive(Debug)]
pub enum ApiError {
    /// 400 - missing/blank field or malformed body.
    Validation(String),
    /// 404 - identifier does not resolve.
    NotFound(String),
    /// Body refused before parsing (wrong content type, too large).
    Rejected(StatusCode, String),
    /// 500 - store or runtime failure.
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Rejected(status, _) => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Rejected(..) => "request_rejected",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Rejected(_, msg)
            | Self::Internal(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message) = match self {
            Self::Internal(detail) => {
                error!("event=api_error module=server status=error kind=internal_error error={detail}");
                ("internal_error", "Internal server error".to_string())
            }
            other => {
                warn!(
                    "event=api_error module=server status=rejected kind={} message={}",
                    other.kind(),
                    other
                );
                (other.kind(), other.to_string())
            }
        };

        let body = ErrorBody {
            error: error.into(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<NoteServiceError> for ApiError {
    fn from(err: NoteServiceError) -> Self {
        match err {
            NoteServiceError::Validation(inner) => ApiError::Validation(inner.to_string()),
            NoteServiceError::NoteNotFound(_) => ApiError::NotFound(err.to_string()),
            NoteServiceError::Repo(_) | NoteServiceError::InconsistentState(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
