use axum::extract::{Path, Query, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::dashboard::*;
use crate::models::shared::ApiResponse;
use crate::state::AppState;
use crate::utils::aggregate;
use crate::utils::id::parse_id;
use crate::utils::pagination::{PageParams, PageQuery};

#[utoipa::path(
    get,
    path = "/stats/{channel_id}",
    tag = "Dashboard",
    operation_id = "getChannelStats",
    summary = "Channel statistics",
    description = "Total videos, views across them, likes across them and subscribers, computed in one statement. A channel without videos reports zero for all four.",
    params(("channel_id" = String, Path, description = "Channel (user) ID")),
    responses(
        (status = 200, description = "Channel statistics", body = ApiResponse<ChannelStats>),
        (status = 400, description = "Invalid channel ID (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(channel_id))]
pub async fn channel_stats(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<ApiResponse<ChannelStats>, AppError> {
    let id = parse_id(&channel_id, "channel")?;
    let stats = aggregate::channel_stats(&state.db, id).await?;
    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

#[utoipa::path(
    get,
    path = "/videos/{channel_id}",
    tag = "Dashboard",
    operation_id = "getChannelVideos",
    summary = "Channel videos with engagement counts",
    description = "Newest first, each annotated with its like and comment counts. The page and its pagination metadata come from one statement. Unpublished videos are only listed for the channel owner.",
    params(("channel_id" = String, Path, description = "Channel (user) ID"), PageQuery),
    responses(
        (status = 200, description = "Page of channel videos", body = ApiResponse<ChannelVideosResponse>),
        (status = 400, description = "Invalid channel ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Malformed token (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer, query), fields(channel_id))]
pub async fn channel_videos(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<ChannelVideosResponse>, AppError> {
    let id = parse_id(&channel_id, "channel")?;
    let (videos, pagination) = aggregate::channel_videos(
        &state.db,
        id,
        viewer.map(|u| u.user_id),
        PageParams::from(&query),
    )
    .await?;

    Ok(ApiResponse::ok(
        ChannelVideosResponse { videos, pagination },
        "Channel videos fetched successfully",
    ))
}
