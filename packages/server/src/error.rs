use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

/// A single field-level problem reported alongside an error.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ErrorDetail {
    /// Offending request field, if the problem is tied to one.
    #[schema(example = "title")]
    pub field: Option<String>,
    #[schema(example = "Title is required")]
    pub message: String,
}

impl ErrorDetail {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }
}

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    #[schema(example = 400)]
    pub status_code: u16,
    /// Always `null` on failure.
    #[schema(value_type = Option<String>)]
    pub data: Option<()>,
    /// Human-readable error description.
    #[schema(example = "Invalid video ID")]
    pub message: String,
    /// Always `false` on failure.
    pub success: bool,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `FORBIDDEN`, `NOT_FOUND`, `CONFLICT`, `UPSTREAM_ERROR`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Field-level details; empty unless several fields failed at once.
    pub errors: Vec<ErrorDetail>,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// Several request fields failed validation together.
    InvalidFields(Vec<ErrorDetail>),
    TokenMissing,
    TokenInvalid,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    /// The media store failed or rejected an operation.
    Upstream {
        status: StatusCode,
        detail: String,
    },
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            AppError::TokenMissing | AppError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream { status, .. } => *status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code_message_details(self) -> (&'static str, String, Vec<ErrorDetail>) {
        match self {
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg, Vec::new()),
            AppError::InvalidFields(details) => {
                let message = details
                    .first()
                    .map(|d| d.message.clone())
                    .unwrap_or_else(|| "Invalid request".into());
                ("VALIDATION_ERROR", message, details)
            }
            AppError::TokenMissing => ("TOKEN_MISSING", "Authentication required".into(), Vec::new()),
            AppError::TokenInvalid => ("TOKEN_INVALID", "Invalid or expired token".into(), Vec::new()),
            AppError::Forbidden(msg) => ("FORBIDDEN", msg, Vec::new()),
            AppError::NotFound(msg) => ("NOT_FOUND", msg, Vec::new()),
            AppError::Conflict(msg) => ("CONFLICT", msg, Vec::new()),
            AppError::Upstream { detail, .. } => {
                tracing::error!("Media store error: {}", detail);
                ("UPSTREAM_ERROR", "Media storage failed".into(), Vec::new())
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ("INTERNAL_ERROR", "An unexpected error occurred".into(), Vec::new())
            }
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let status = self.status();
        let (code, message, errors) = self.code_message_details();
        (
            status,
            ErrorBody {
                status_code: status.as_u16(),
                data: None,
                message,
                success: false,
                code,
                errors,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeLimitExceeded { limit, .. } => {
                AppError::Validation(format!("File exceeds the {limit} byte upload limit"))
            }
            StorageError::Remote(detail) => AppError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                detail,
            },
            other => AppError::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: other.to_string(),
            },
        }
    }
}

/// Whether a database error is a unique-constraint violation.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
