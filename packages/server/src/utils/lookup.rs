use sea_orm::sea_query::LockType;
use sea_orm::{ConnectionTrait, DatabaseTransaction, EntityTrait, QuerySelect};
use uuid::Uuid;

use crate::entity::{comment, playlist, tweet, user, video};
use crate::error::AppError;

/// Look up a video by ID, returning 404 if not found.
pub async fn find_video<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<video::Model, AppError> {
    video::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".into()))
}

/// Look up a video as `viewer` sees it.
///
/// Unpublished videos exist only for their owner; anyone else gets the same
/// 404 as for a missing video.
pub async fn find_visible_video<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    viewer: Option<Uuid>,
) -> Result<video::Model, AppError> {
    let video = find_video(db, id).await?;
    if !video.is_published && viewer != Some(video.owner_id) {
        return Err(AppError::NotFound("Video not found".into()));
    }
    Ok(video)
}

pub async fn find_comment<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<comment::Model, AppError> {
    comment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))
}

/// Look up a comment as `viewer` sees it: comments under an unpublished
/// video are hidden along with the video.
pub async fn find_visible_comment<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    viewer: Option<Uuid>,
) -> Result<comment::Model, AppError> {
    let comment = find_comment(db, id).await?;
    match find_visible_video(db, comment.video_id, viewer).await {
        Ok(_) => Ok(comment),
        Err(AppError::NotFound(_)) => Err(AppError::NotFound("Comment not found".into())),
        Err(e) => Err(e),
    }
}

pub async fn find_tweet<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<tweet::Model, AppError> {
    tweet::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".into()))
}

pub async fn find_playlist<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<playlist::Model, AppError> {
    playlist::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".into()))
}

pub async fn find_playlist_for_update(
    txn: &DatabaseTransaction,
    id: Uuid,
) -> Result<playlist::Model, AppError> {
    playlist::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".into()))
}

/// Look up a user in their role as a channel.
pub async fn find_channel<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel not found".into()))
}

pub async fn find_user<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}
