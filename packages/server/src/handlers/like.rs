use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::like::{self, LikeKind, LikeTarget};
use crate::entity::video;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::like::*;
use crate::models::shared::ApiResponse;
use crate::models::video::VideoResponse;
use crate::state::AppState;
use crate::utils::id::parse_id;
use crate::utils::lookup::{find_tweet, find_visible_comment, find_visible_video};
use crate::utils::pagination::{PageParams, PageQuery, fetch_page};
use crate::utils::toggle::{LikeRelation, toggle};
use crate::utils::users::load_summaries;

/// Flip the actor's like on an existing target.
async fn toggle_like(
    state: &AppState,
    actor: Uuid,
    target: LikeTarget,
) -> Result<ApiResponse<LikeToggleResponse>, AppError> {
    let outcome = toggle(&state.db, &LikeRelation { actor, target }).await?;

    let noun = match target.kind() {
        LikeKind::Video => "Video",
        LikeKind::Comment => "Comment",
        LikeKind::Tweet => "Tweet",
    };
    tracing::info!(
        target_id = %target.id(),
        liked = outcome.active,
        like_count = outcome.count,
        "{} like toggled",
        noun
    );

    let data = LikeToggleResponse {
        liked: outcome.active,
        like_count: outcome.count,
    };
    Ok(if outcome.active {
        ApiResponse::created(data, format!("{noun} liked successfully"))
    } else {
        ApiResponse::ok(data, format!("{noun} unliked successfully"))
    })
}

#[utoipa::path(
    post,
    path = "/toggle/v/{video_id}",
    tag = "Likes",
    operation_id = "toggleVideoLike",
    summary = "Like or unlike a video",
    description = "Removes the caller's like if present, otherwise adds it. Responds 201 when the video is now liked and 200 when it is not. A concurrent duplicate like loses with 409.",
    params(("video_id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Like removed", body = ApiResponse<LikeToggleResponse>),
        (status = 201, description = "Like added", body = ApiResponse<LikeToggleResponse>),
        (status = 400, description = "Invalid video ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already liked (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id))]
pub async fn toggle_video_like(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<ApiResponse<LikeToggleResponse>, AppError> {
    let id = parse_id(&video_id, "video")?;
    find_visible_video(&state.db, id, Some(auth_user.user_id)).await?;
    toggle_like(&state, auth_user.user_id, LikeTarget::Video(id)).await
}

#[utoipa::path(
    post,
    path = "/toggle/c/{comment_id}",
    tag = "Likes",
    operation_id = "toggleCommentLike",
    summary = "Like or unlike a comment",
    params(("comment_id" = String, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Like removed", body = ApiResponse<LikeToggleResponse>),
        (status = 201, description = "Like added", body = ApiResponse<LikeToggleResponse>),
        (status = 400, description = "Invalid comment ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already liked (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(comment_id))]
pub async fn toggle_comment_like(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<ApiResponse<LikeToggleResponse>, AppError> {
    let id = parse_id(&comment_id, "comment")?;
    find_visible_comment(&state.db, id, Some(auth_user.user_id)).await?;
    toggle_like(&state, auth_user.user_id, LikeTarget::Comment(id)).await
}

#[utoipa::path(
    post,
    path = "/toggle/t/{tweet_id}",
    tag = "Likes",
    operation_id = "toggleTweetLike",
    summary = "Like or unlike a tweet",
    params(("tweet_id" = String, Path, description = "Tweet ID")),
    responses(
        (status = 200, description = "Like removed", body = ApiResponse<LikeToggleResponse>),
        (status = 201, description = "Like added", body = ApiResponse<LikeToggleResponse>),
        (status = 400, description = "Invalid tweet ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Tweet not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already liked (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(tweet_id))]
pub async fn toggle_tweet_like(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> Result<ApiResponse<LikeToggleResponse>, AppError> {
    let id = parse_id(&tweet_id, "tweet")?;
    find_tweet(&state.db, id).await?;
    toggle_like(&state, auth_user.user_id, LikeTarget::Tweet(id)).await
}

#[utoipa::path(
    get,
    path = "/videos",
    tag = "Likes",
    operation_id = "getLikedVideos",
    summary = "List videos the caller liked",
    description = "Most recently liked first. Unpublished videos are skipped unless the caller owns them.",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of liked videos", body = ApiResponse<LikedVideosResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = %auth_user.user_id))]
pub async fn liked_videos(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<LikedVideosResponse>, AppError> {
    let visible_videos = SeaQuery::select()
        .column(video::Column::Id)
        .from(video::Entity)
        .cond_where(
            Condition::any()
                .add(video::Column::IsPublished.eq(true))
                .add(video::Column::OwnerId.eq(auth_user.user_id)),
        )
        .to_owned();

    let select = like::Entity::find()
        .filter(like::Column::LikedBy.eq(auth_user.user_id))
        .filter(like::Column::TargetKind.eq(LikeKind::Video))
        .filter(like::Column::TargetId.in_subquery(visible_videos))
        .order_by_desc(like::Column::CreatedAt)
        .order_by_desc(like::Column::Id);
    let (likes, pagination) = fetch_page(&state.db, select, PageParams::from(&query)).await?;

    let mut videos: HashMap<Uuid, video::Model> = video::Entity::find()
        .filter(video::Column::Id.is_in(likes.iter().map(|l| l.target_id)))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();
    let owners = load_summaries(&state.db, videos.values().map(|v| v.owner_id)).await?;

    // A video deleted between the two queries just drops out of the page.
    let videos = likes
        .into_iter()
        .filter_map(|l| {
            let video = videos.remove(&l.target_id)?;
            let owner = owners.get(&video.owner_id).cloned();
            Some(LikedVideo {
                liked_at: l.created_at,
                video: VideoResponse::with_owner(video, owner),
            })
        })
        .collect();

    Ok(ApiResponse::ok(
        LikedVideosResponse { videos, pagination },
        "Liked videos fetched successfully",
    ))
}
