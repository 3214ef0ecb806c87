use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::{PageMeta, validate_content};
use super::user::UserSummary;
use crate::entity::tweet;
use crate::error::AppError;

pub const MAX_TWEET_CHARS: usize = 280;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TweetRequest {
    #[schema(example = "Uploading a new video tonight")]
    pub content: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TweetResponse {
    pub id: Uuid,
    pub content: String,
    pub owner_id: Uuid,
    pub owner: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TweetResponse {
    pub fn with_owner(m: tweet::Model, owner: Option<UserSummary>) -> Self {
        Self {
            id: m.id,
            content: m.content,
            owner_id: m.owner_id,
            owner,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TweetListResponse {
    pub tweets: Vec<TweetResponse>,
    pub pagination: PageMeta,
}

pub fn validate_tweet(req: &TweetRequest) -> Result<(), AppError> {
    validate_content(&req.content, "Tweet", Some(MAX_TWEET_CHARS))
}
