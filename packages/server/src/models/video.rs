use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::PageMeta;
use super::user::UserSummary;
use crate::entity::video;
use crate::error::ErrorDetail;

pub const MAX_DESCRIPTION_CHARS: usize = 5000;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VideoListQuery {
    /// Page number (1-based). Default: 1.
    pub page: Option<String>,
    /// Items per page, at most 100. Default: 10.
    pub limit: Option<String>,
    /// Case-insensitive substring matched against title and description.
    pub query: Option<String>,
    /// One of `created_at` (default), `updated_at`, `title`, `views`, `duration`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_type: Option<String>,
    /// Only videos owned by this user.
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    #[schema(example = "My first video")]
    pub title: String,
    pub description: String,
    #[schema(example = "/media/video/0190a5b4-9c1e-7000-8000-000000000000.mp4")]
    pub video_url: String,
    pub thumbnail_url: String,
    /// Seconds.
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner_id: Uuid,
    /// Present when the owner could be resolved.
    pub owner: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoResponse {
    pub fn with_owner(m: video::Model, owner: Option<UserSummary>) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            video_url: m.video_url,
            thumbnail_url: m.thumbnail_url,
            duration: m.duration,
            views: m.views,
            is_published: m.is_published,
            owner_id: m.owner_id,
            owner,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<video::Model> for VideoResponse {
    fn from(m: video::Model) -> Self {
        Self::with_owner(m, None)
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VideoListResponse {
    pub videos: Vec<VideoResponse>,
    pub pagination: PageMeta,
}

/// Check the text fields of a video form.
///
/// On create the title is required; on update a blank title means "keep".
pub fn validate_video_text(
    title: Option<&str>,
    description: Option<&str>,
    creating: bool,
) -> Vec<ErrorDetail> {
    let mut errors = Vec::new();

    match title.map(str::trim).filter(|t| !t.is_empty()) {
        None if creating => errors.push(ErrorDetail::field("title", "Title is required")),
        Some(t) if t.chars().count() > 256 => errors.push(ErrorDetail::field(
            "title",
            "Title must be at most 256 characters",
        )),
        _ => {}
    }

    if let Some(d) = description
        && d.trim().chars().count() > MAX_DESCRIPTION_CHARS
    {
        errors.push(ErrorDetail::field(
            "description",
            format!("Description must be at most {MAX_DESCRIPTION_CHARS} characters"),
        ));
    }

    errors
}
