use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::Serialize;
use uuid::Uuid;

use super::shared::PageMeta;

#[derive(Debug, Default, PartialEq, Eq, Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ChannelStats {
    pub total_videos: i64,
    pub total_views: i64,
    /// Likes across all of the channel's videos.
    pub total_likes: i64,
    pub total_subscribers: i64,
}

#[derive(Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ChannelVideo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ChannelVideosResponse {
    pub videos: Vec<ChannelVideo>,
    pub pagination: PageMeta,
}
