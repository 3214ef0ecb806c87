use chrono::{DateTime, Utc};
use serde::Serialize;

use super::shared::PageMeta;
use super::video::VideoResponse;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LikeToggleResponse {
    /// Whether the actor likes the target after the call.
    pub liked: bool,
    /// Likes on the target after the call.
    #[schema(example = 3)]
    pub like_count: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LikedVideo {
    pub liked_at: DateTime<Utc>,
    pub video: VideoResponse,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LikedVideosResponse {
    pub videos: Vec<LikedVideo>,
    pub pagination: PageMeta,
}
