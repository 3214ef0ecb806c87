use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 200)]
    pub status_code: u16,
    pub data: Option<T>,
    #[schema(example = "Videos fetched successfully")]
    pub message: String,
    /// Always `true` on success.
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.is_success(),
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, Some(data), message)
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, Some(data), message)
    }
}

impl ApiResponse<()> {
    /// A 200 response whose `data` is `null`.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, None, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct PageMeta {
    /// Total number of matching items across all pages.
    #[schema(example = 15)]
    pub total: u64,
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 10)]
    pub limit: u64,
    #[schema(example = 2)]
    pub total_pages: u64,
    /// `total - page * limit > 0`.
    pub has_next_page: bool,
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str, noun: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation(format!("{noun} is required")));
    }
    if title.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{noun} must be at most 256 characters"
        )));
    }
    Ok(())
}

/// Validate free-form text content: non-empty after trimming and, when `max`
/// is given, at most `max` characters after trimming.
pub fn validate_content(content: &str, noun: &str, max: Option<usize>) -> Result<(), AppError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation(format!(
            "{noun} content cannot be empty"
        )));
    }
    if let Some(max) = max
        && content.chars().count() > max
    {
        return Err(AppError::Validation(format!(
            "{noun} must be at most {max} characters"
        )));
    }
    Ok(())
}
