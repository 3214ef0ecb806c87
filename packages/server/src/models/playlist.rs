use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::{PageMeta, validate_title};
use super::video::{MAX_DESCRIPTION_CHARS, VideoResponse};
use crate::entity::playlist;
use crate::error::AppError;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreatePlaylistRequest {
    #[schema(example = "Favourites")]
    pub name: String,
    pub description: Option<String>,
}

/// Blank or absent fields are left unchanged.
#[derive(Debug, Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct PlaylistSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub video_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PlaylistResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<playlist::Model> for PlaylistResponse {
    fn from(m: playlist::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            owner_id: m.owner_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PlaylistEntry {
    pub position: i32,
    pub added_at: DateTime<Utc>,
    pub video: VideoResponse,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PlaylistDetailResponse {
    #[serde(flatten)]
    pub playlist: PlaylistResponse,
    /// In playlist order.
    pub videos: Vec<PlaylistEntry>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PlaylistListResponse {
    pub playlists: Vec<PlaylistSummary>,
    pub pagination: PageMeta,
}

pub fn validate_create_playlist(req: &CreatePlaylistRequest) -> Result<(), AppError> {
    validate_title(&req.name, "Playlist name")?;
    validate_description(req.description.as_deref())
}

pub fn validate_update_playlist(req: &UpdatePlaylistRequest) -> Result<(), AppError> {
    if let Some(name) = req.name.as_deref()
        && !name.trim().is_empty()
    {
        validate_title(name, "Playlist name")?;
    }
    validate_description(req.description.as_deref())
}

fn validate_description(description: Option<&str>) -> Result<(), AppError> {
    if let Some(d) = description
        && d.trim().chars().count() > MAX_DESCRIPTION_CHARS
    {
        return Err(AppError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(())
}
