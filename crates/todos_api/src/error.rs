//! Transport error type and its HTTP response mapping.
//!
//! # Invariants
//! - Not-found service errors map to 404, input errors to 400.
//! - Internal details are logged, never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use todos_core::{RepoError, TodoServiceError, TodoValidationError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
}

impl ErrorResponse {
    /// Builds a body stamped with the current local time.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            time_stamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::NotFound(message) | Self::BadRequest(message) => message,
            Self::Internal(details) => {
                error!("event=http_error module=api status=error error={details}");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorResponse::new(status, message))).into_response()
    }
}

impl From<TodoServiceError> for ApiError {
    fn from(value: TodoServiceError) -> Self {
        match value {
            err if err.is_not_found() => Self::NotFound(err.to_string()),
            err @ TodoServiceError::InvalidSortField(_) => Self::BadRequest(err.to_string()),
            TodoServiceError::Repo(RepoError::Validation(err)) => err.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        TodoServiceError::from(value).into()
    }
}

impl From<TodoValidationError> for ApiError {
    fn from(value: TodoValidationError) -> Self {
        Self::BadRequest(value.to_string())
    }
}
