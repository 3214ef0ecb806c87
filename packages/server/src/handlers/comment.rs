use axum::extract::{Path, Query, State};
use chrono::Utc;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{comment, like};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::comment::*;
use crate::models::shared::ApiResponse;
use crate::state::AppState;
use crate::utils::id::parse_id;
use crate::utils::lookup::{find_comment, find_visible_comment, find_visible_video};
use crate::utils::ownership::ensure_owner;
use crate::utils::pagination::{PageParams, PageQuery, fetch_page};
use crate::utils::users::{load_summaries, load_summary};

#[utoipa::path(
    get,
    path = "/{video_id}",
    tag = "Comments",
    operation_id = "getVideoComments",
    summary = "List comments on a video",
    description = "Returns a page of the video's comments, newest first, each with its author's summary. Comments on an unpublished video are only listed for the video's owner.",
    params(("video_id" = String, Path, description = "Video ID"), PageQuery),
    responses(
        (status = 200, description = "Page of comments", body = ApiResponse<CommentListResponse>),
        (status = 400, description = "Invalid video ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer, query), fields(video_id))]
pub async fn list_comments(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<CommentListResponse>, AppError> {
    let id = parse_id(&video_id, "video")?;
    find_visible_video(&state.db, id, viewer.map(|u| u.user_id)).await?;

    let select = comment::Entity::find()
        .filter(comment::Column::VideoId.eq(id))
        .order_by_desc(comment::Column::CreatedAt)
        .order_by_desc(comment::Column::Id);
    let (models, pagination) = fetch_page(&state.db, select, PageParams::from(&query)).await?;

    let owners = load_summaries(&state.db, models.iter().map(|m| m.owner_id)).await?;
    let comments = models
        .into_iter()
        .map(|m| {
            let owner = owners.get(&m.owner_id).cloned();
            CommentResponse::with_owner(m, owner)
        })
        .collect();

    Ok(ApiResponse::ok(
        CommentListResponse {
            comments,
            pagination,
        },
        "Comments fetched successfully",
    ))
}

#[utoipa::path(
    post,
    path = "/{video_id}",
    tag = "Comments",
    operation_id = "addComment",
    summary = "Comment on a video",
    params(("video_id" = String, Path, description = "Video ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = ApiResponse<CommentResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(video_id))]
pub async fn add_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    AppJson(payload): AppJson<CommentRequest>,
) -> Result<ApiResponse<CommentResponse>, AppError> {
    let id = parse_id(&video_id, "video")?;
    validate_comment(&payload)?;
    find_visible_video(&state.db, id, Some(auth_user.user_id)).await?;

    let now = Utc::now();
    let model = comment::ActiveModel {
        id: Set(Uuid::now_v7()),
        content: Set(payload.content.trim().to_string()),
        video_id: Set(id),
        owner_id: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    let owner = load_summary(&state.db, model.owner_id).await?;
    Ok(ApiResponse::created(
        CommentResponse::with_owner(model, owner),
        "Comment added successfully",
    ))
}

#[utoipa::path(
    patch,
    path = "/c/{comment_id}",
    tag = "Comments",
    operation_id = "updateComment",
    summary = "Edit a comment",
    params(("comment_id" = String, Path, description = "Comment ID")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = ApiResponse<CommentResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(comment_id))]
pub async fn update_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    AppJson(payload): AppJson<CommentRequest>,
) -> Result<ApiResponse<CommentResponse>, AppError> {
    let id = parse_id(&comment_id, "comment")?;
    validate_comment(&payload)?;
    let existing = find_visible_comment(&state.db, id, Some(auth_user.user_id)).await?;
    ensure_owner(&existing, auth_user.user_id)?;

    let mut active: comment::ActiveModel = existing.into();
    active.content = Set(payload.content.trim().to_string());
    active.updated_at = Set(Utc::now());
    let model = active.update(&state.db).await?;

    let owner = load_summary(&state.db, model.owner_id).await?;
    Ok(ApiResponse::ok(
        CommentResponse::with_owner(model, owner),
        "Comment updated successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/c/{comment_id}",
    tag = "Comments",
    operation_id = "deleteComment",
    summary = "Delete a comment",
    description = "Deletes the comment and every like on it.",
    params(("comment_id" = String, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 400, description = "Invalid comment ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(comment_id))]
pub async fn delete_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&comment_id, "comment")?;
    let existing = find_comment(&state.db, id).await?;
    ensure_owner(&existing, auth_user.user_id)?;

    let txn = state.db.begin().await?;
    like::Entity::delete_many()
        .filter(like::Column::TargetKind.eq(like::LikeKind::Comment))
        .filter(like::Column::TargetId.eq(id))
        .exec(&txn)
        .await?;
    comment::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(comment_id = %id, "Deleted comment");
    Ok(ApiResponse::empty("Comment deleted successfully"))
}
