use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::{PageMeta, validate_content};
use super::user::UserSummary;
use crate::entity::comment;
use crate::error::AppError;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CommentRequest {
    #[schema(example = "Great video!")]
    pub content: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub owner: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn with_owner(m: comment::Model, owner: Option<UserSummary>) -> Self {
        Self {
            id: m.id,
            content: m.content,
            video_id: m.video_id,
            owner_id: m.owner_id,
            owner,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
    pub pagination: PageMeta,
}

pub fn validate_comment(req: &CommentRequest) -> Result<(), AppError> {
    validate_content(&req.content, "Comment", None)
}
