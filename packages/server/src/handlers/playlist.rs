use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use chrono::Utc;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{playlist, playlist_video, video};
use crate::error::{AppError, ErrorBody, is_unique_violation};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::playlist::*;
use crate::models::shared::ApiResponse;
use crate::models::video::VideoResponse;
use crate::state::AppState;
use crate::utils::aggregate;
use crate::utils::id::parse_id;
use crate::utils::lookup::{
    find_playlist, find_playlist_for_update, find_user, find_visible_video,
};
use crate::utils::ownership::ensure_owner;
use crate::utils::pagination::{PageParams, PageQuery};
use crate::utils::users::load_summaries;

#[utoipa::path(
    post,
    path = "/",
    tag = "Playlists",
    operation_id = "createPlaylist",
    summary = "Create a playlist",
    request_body = CreatePlaylistRequest,
    responses(
        (status = 201, description = "Playlist created", body = ApiResponse<PlaylistResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_playlist(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePlaylistRequest>,
) -> Result<ApiResponse<PlaylistResponse>, AppError> {
    validate_create_playlist(&payload)?;

    let now = Utc::now();
    let model = playlist::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()),
        owner_id: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    Ok(ApiResponse::created(
        PlaylistResponse::from(model),
        "Playlist created successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = "Playlists",
    operation_id = "getUserPlaylists",
    summary = "List a user's playlists",
    description = "Most recently updated first, each with its number of videos.",
    params(("user_id" = String, Path, description = "User ID"), PageQuery),
    responses(
        (status = 200, description = "Page of playlists", body = ApiResponse<PlaylistListResponse>),
        (status = 400, description = "Invalid user ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(user_id))]
pub async fn user_playlists(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<PlaylistListResponse>, AppError> {
    let id = parse_id(&user_id, "user")?;
    find_user(&state.db, id).await?;

    let (playlists, pagination) =
        aggregate::user_playlists(&state.db, id, PageParams::from(&query)).await?;

    Ok(ApiResponse::ok(
        PlaylistListResponse {
            playlists,
            pagination,
        },
        "Playlists fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/{playlist_id}",
    tag = "Playlists",
    operation_id = "getPlaylist",
    summary = "Get a playlist with its videos",
    description = "Videos are returned in playlist order. Unpublished videos are left out unless the caller owns them.",
    params(("playlist_id" = String, Path, description = "Playlist ID")),
    responses(
        (status = 200, description = "Playlist details", body = ApiResponse<PlaylistDetailResponse>),
        (status = 400, description = "Invalid playlist ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Playlist not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer), fields(playlist_id))]
pub async fn get_playlist(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> Result<ApiResponse<PlaylistDetailResponse>, AppError> {
    let id = parse_id(&playlist_id, "playlist")?;
    let model = find_playlist(&state.db, id).await?;

    let entries = playlist_video::Entity::find()
        .filter(playlist_video::Column::PlaylistId.eq(id))
        .order_by_asc(playlist_video::Column::Position)
        .order_by_asc(playlist_video::Column::AddedAt)
        .all(&state.db)
        .await?;

    let viewer_id = viewer.map(|u| u.user_id);
    let mut videos: HashMap<Uuid, video::Model> = video::Entity::find()
        .filter(video::Column::Id.is_in(entries.iter().map(|e| e.video_id)))
        .all(&state.db)
        .await?
        .into_iter()
        .filter(|v| v.is_published || Some(v.owner_id) == viewer_id)
        .map(|v| (v.id, v))
        .collect();
    let owners = load_summaries(&state.db, videos.values().map(|v| v.owner_id)).await?;

    let videos = entries
        .into_iter()
        .filter_map(|entry| {
            let video = videos.remove(&entry.video_id)?;
            let owner = owners.get(&video.owner_id).cloned();
            Some(PlaylistEntry {
                position: entry.position,
                added_at: entry.added_at,
                video: VideoResponse::with_owner(video, owner),
            })
        })
        .collect();

    Ok(ApiResponse::ok(
        PlaylistDetailResponse {
            playlist: model.into(),
            videos,
        },
        "Playlist fetched successfully",
    ))
}

#[utoipa::path(
    patch,
    path = "/{playlist_id}",
    tag = "Playlists",
    operation_id = "updatePlaylist",
    summary = "Rename or re-describe a playlist",
    description = "Absent or blank fields keep their current value. An empty payload returns the playlist unchanged.",
    params(("playlist_id" = String, Path, description = "Playlist ID")),
    request_body = UpdatePlaylistRequest,
    responses(
        (status = 200, description = "Playlist updated", body = ApiResponse<PlaylistResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Playlist not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(playlist_id))]
pub async fn update_playlist(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    AppJson(payload): AppJson<UpdatePlaylistRequest>,
) -> Result<ApiResponse<PlaylistResponse>, AppError> {
    let id = parse_id(&playlist_id, "playlist")?;
    validate_update_playlist(&payload)?;
    let existing = find_playlist(&state.db, id).await?;
    ensure_owner(&existing, auth_user.user_id)?;

    let name = payload.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    if name.is_none() && description.is_none() {
        return Ok(ApiResponse::ok(
            existing.into(),
            "Playlist updated successfully",
        ));
    }

    let mut active: playlist::ActiveModel = existing.into();
    if let Some(name) = name {
        active.name = Set(name.to_string());
    }
    if let Some(description) = description {
        active.description = Set(description.to_string());
    }
    active.updated_at = Set(Utc::now());
    let model = active.update(&state.db).await?;

    Ok(ApiResponse::ok(model.into(), "Playlist updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/{playlist_id}",
    tag = "Playlists",
    operation_id = "deletePlaylist",
    summary = "Delete a playlist",
    description = "Deletes the playlist and its entries. The videos themselves are untouched.",
    params(("playlist_id" = String, Path, description = "Playlist ID")),
    responses(
        (status = 200, description = "Playlist deleted"),
        (status = 400, description = "Invalid playlist ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Playlist not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(playlist_id))]
pub async fn delete_playlist(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&playlist_id, "playlist")?;
    let existing = find_playlist(&state.db, id).await?;
    ensure_owner(&existing, auth_user.user_id)?;

    let txn = state.db.begin().await?;
    playlist_video::Entity::delete_many()
        .filter(playlist_video::Column::PlaylistId.eq(id))
        .exec(&txn)
        .await?;
    playlist::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(playlist_id = %id, "Deleted playlist");
    Ok(ApiResponse::empty("Playlist deleted successfully"))
}

#[utoipa::path(
    patch,
    path = "/add/{video_id}/{playlist_id}",
    tag = "Playlists",
    operation_id = "addVideoToPlaylist",
    summary = "Append a video to a playlist",
    description = "The video goes after the current last entry. Adding a video that is already in the playlist is a conflict.",
    params(
        ("video_id" = String, Path, description = "Video ID"),
        ("playlist_id" = String, Path, description = "Playlist ID"),
    ),
    responses(
        (status = 200, description = "Video added", body = ApiResponse<PlaylistResponse>),
        (status = 400, description = "Invalid ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Playlist or video not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Video already in playlist (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id, playlist_id))]
pub async fn add_video_to_playlist(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> Result<ApiResponse<PlaylistResponse>, AppError> {
    let video_id = parse_id(&video_id, "video")?;
    let playlist_id = parse_id(&playlist_id, "playlist")?;

    // The row lock serializes appends to one playlist, so positions stay unique.
    let txn = state.db.begin().await?;
    let existing = find_playlist_for_update(&txn, playlist_id).await?;
    ensure_owner(&existing, auth_user.user_id)?;

    find_visible_video(&txn, video_id, Some(auth_user.user_id)).await?;

    let last: Option<Option<i32>> = playlist_video::Entity::find()
        .select_only()
        .column_as(playlist_video::Column::Position.max(), "last_position")
        .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
        .into_tuple()
        .one(&txn)
        .await?;
    let position = last.flatten().map_or(0, |p| p + 1);

    let now = Utc::now();
    let entry = playlist_video::ActiveModel {
        playlist_id: Set(playlist_id),
        video_id: Set(video_id),
        position: Set(position),
        added_at: Set(now),
    };
    match playlist_video::Entity::insert(entry)
        .exec_without_returning(&txn)
        .await
    {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict("Video already in playlist".into()));
        }
        Err(e) => return Err(e.into()),
    }

    let mut active: playlist::ActiveModel = existing.into();
    active.updated_at = Set(now);
    let model = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(playlist_id = %playlist_id, video_id = %video_id, position, "Added video to playlist");
    Ok(ApiResponse::ok(
        model.into(),
        "Video added to playlist successfully",
    ))
}

#[utoipa::path(
    patch,
    path = "/remove/{video_id}/{playlist_id}",
    tag = "Playlists",
    operation_id = "removeVideoFromPlaylist",
    summary = "Remove a video from a playlist",
    description = "Succeeds whether or not the video was in the playlist.",
    params(
        ("video_id" = String, Path, description = "Video ID"),
        ("playlist_id" = String, Path, description = "Playlist ID"),
    ),
    responses(
        (status = 200, description = "Video removed", body = ApiResponse<PlaylistResponse>),
        (status = 400, description = "Invalid ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Playlist not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id, playlist_id))]
pub async fn remove_video_from_playlist(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> Result<ApiResponse<PlaylistResponse>, AppError> {
    let video_id = parse_id(&video_id, "video")?;
    let playlist_id = parse_id(&playlist_id, "playlist")?;
    let existing = find_playlist(&state.db, playlist_id).await?;
    ensure_owner(&existing, auth_user.user_id)?;

    let removed = playlist_video::Entity::delete_many()
        .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
        .filter(playlist_video::Column::VideoId.eq(video_id))
        .exec(&state.db)
        .await?;

    let model = if removed.rows_affected > 0 {
        tracing::info!(playlist_id = %playlist_id, video_id = %video_id, "Removed video from playlist");
        let mut active: playlist::ActiveModel = existing.into();
        active.updated_at = Set(Utc::now());
        active.update(&state.db).await?
    } else {
        existing
    };

    Ok(ApiResponse::ok(
        model.into(),
        "Video removed from playlist successfully",
    ))
}
