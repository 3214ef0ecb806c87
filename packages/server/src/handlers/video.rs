use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use chrono::Utc;
use common::storage::{MediaKind, UploadedMedia};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{comment, like, playlist_video, video};
use crate::error::{AppError, ErrorBody, ErrorDetail};
use crate::extractors::auth::AuthUser;
use crate::models::shared::{ApiResponse, escape_like};
use crate::models::video::*;
use crate::state::AppState;
use crate::utils::id::parse_id;
use crate::utils::lookup::{find_video, find_visible_video};
use crate::utils::ownership::ensure_owner;
use crate::utils::pagination::{PageParams, fetch_page};
use crate::utils::upload::{MediaForm, SpooledFile, discard, read_form, store};
use crate::utils::users::{load_summaries, load_summary};

#[utoipa::path(
    get,
    path = "/",
    tag = "Videos",
    operation_id = "listVideos",
    summary = "List videos with pagination, search and sorting",
    description = "Returns a page of videos with owner summaries. Anonymous callers and non-owners only see published videos; an authenticated owner also sees their own unpublished ones. `query` matches title or description case-insensitively.",
    params(VideoListQuery),
    responses(
        (status = 200, description = "Page of videos", body = ApiResponse<VideoListResponse>),
        (status = 400, description = "Invalid sort or user ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Malformed token (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer, query))]
pub async fn list_videos(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Query(query): Query<VideoListQuery>,
) -> Result<ApiResponse<VideoListResponse>, AppError> {
    let params = PageParams::from_raw(query.page.as_deref(), query.limit.as_deref());

    let sort_column = match query.sort_by.as_deref().unwrap_or("created_at") {
        "created_at" => video::Column::CreatedAt,
        "updated_at" => video::Column::UpdatedAt,
        "title" => video::Column::Title,
        "views" => video::Column::Views,
        "duration" => video::Column::Duration,
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: created_at, updated_at, title, views, duration".into(),
            ));
        }
    };
    let sort_order = match query.sort_type.as_deref() {
        None | Some("desc") => Order::Desc,
        Some("asc") => Order::Asc,
        Some(_) => {
            return Err(AppError::Validation(
                "sort_type must be one of: asc, desc".into(),
            ));
        }
    };

    let mut select = video::Entity::find();

    if let Some(raw) = query.user_id.as_deref().filter(|s| !s.is_empty()) {
        let owner_id = parse_id(raw, "user")?;
        select = select.filter(video::Column::OwnerId.eq(owner_id));
    }

    select = match viewer {
        Some(ref user) => select.filter(
            Condition::any()
                .add(video::Column::IsPublished.eq(true))
                .add(video::Column::OwnerId.eq(user.user_id)),
        ),
        None => select.filter(video::Column::IsPublished.eq(true)),
    };

    if let Some(ref search) = query.query {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(video::Column::Title)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(video::Column::Description)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }
    }

    // Tie-break on id so pages stay stable when the sort key repeats.
    select = select
        .order_by(sort_column, sort_order.clone())
        .order_by(video::Column::Id, sort_order);

    let (models, pagination) = fetch_page(&state.db, select, params).await?;
    let owners = load_summaries(&state.db, models.iter().map(|m| m.owner_id)).await?;
    let videos = models
        .into_iter()
        .map(|m| {
            let owner = owners.get(&m.owner_id).cloned();
            VideoResponse::with_owner(m, owner)
        })
        .collect();

    Ok(ApiResponse::ok(
        VideoListResponse { videos, pagination },
        "Videos fetched successfully",
    ))
}

/// Pull a required file out of the form, recording a field error if it is
/// missing or of the wrong kind.
fn required_file<'a>(
    form: &'a MediaForm,
    field: &str,
    kind: MediaKind,
    errors: &mut Vec<ErrorDetail>,
) -> Option<&'a SpooledFile> {
    match form.files.get(field) {
        None => {
            errors.push(ErrorDetail::field(field, format!("A {field} file is required")));
            None
        }
        Some(file) => match file.check_kind(field, kind) {
            Some(problem) => {
                errors.push(problem);
                None
            }
            None => Some(file),
        },
    }
}

/// Like [`required_file`], for fields that may be left out.
fn optional_file<'a>(
    form: &'a MediaForm,
    field: &str,
    kind: MediaKind,
    errors: &mut Vec<ErrorDetail>,
) -> Option<&'a SpooledFile> {
    let file = form.files.get(field)?;
    if let Some(problem) = file.check_kind(field, kind) {
        errors.push(problem);
        return None;
    }
    Some(file)
}

async fn discard_all(state: &AppState, uploads: &[&UploadedMedia]) {
    for uploaded in uploads {
        discard(&*state.media, &uploaded.storage_id).await;
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Videos",
    operation_id = "publishVideo",
    summary = "Publish a new video",
    description = "Uploads a video file and its thumbnail to the media store and creates a published video owned by the caller. Every invalid field is reported at once.",
    request_body(
        content_type = "multipart/form-data",
        description = "Fields: `title` (required, 1-256 chars), `description` (optional, up to 5000 chars), `video` (required, video/*), `thumbnail` (required, image/*)",
    ),
    responses(
        (status = 201, description = "Video published", body = ApiResponse<VideoResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 502, description = "Media store failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = %auth_user.user_id))]
pub async fn publish_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<ApiResponse<VideoResponse>, AppError> {
    let form = read_form(&mut multipart, state.config.storage.max_upload_size).await?;

    let mut errors = validate_video_text(form.text("title"), form.text("description"), true);
    let video_file = required_file(&form, "video", MediaKind::Video, &mut errors);
    let thumbnail = required_file(&form, "thumbnail", MediaKind::Image, &mut errors);
    let (Some(video_file), Some(thumbnail), true) = (video_file, thumbnail, errors.is_empty())
    else {
        return Err(AppError::InvalidFields(errors));
    };

    let uploaded_video = store(&*state.media, video_file, MediaKind::Video).await?;
    let uploaded_thumb = match store(&*state.media, thumbnail, MediaKind::Image).await {
        Ok(u) => u,
        Err(e) => {
            discard_all(&state, &[&uploaded_video]).await;
            return Err(e);
        }
    };

    let now = Utc::now();
    let new_video = video::ActiveModel {
        id: Set(Uuid::now_v7()),
        title: Set(form.text("title").unwrap_or_default().trim().to_string()),
        description: Set(form
            .text("description")
            .unwrap_or_default()
            .trim()
            .to_string()),
        video_url: Set(uploaded_video.url.clone()),
        video_storage_id: Set(uploaded_video.storage_id.clone()),
        thumbnail_url: Set(uploaded_thumb.url.clone()),
        thumbnail_storage_id: Set(uploaded_thumb.storage_id.clone()),
        duration: Set(uploaded_video.duration.unwrap_or_default()),
        views: Set(0),
        is_published: Set(true),
        owner_id: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = match new_video.insert(&state.db).await {
        Ok(m) => m,
        Err(e) => {
            discard_all(&state, &[&uploaded_video, &uploaded_thumb]).await;
            return Err(e.into());
        }
    };

    tracing::info!(video_id = %model.id, "Published video");
    let owner = load_summary(&state.db, model.owner_id).await?;
    Ok(ApiResponse::created(
        VideoResponse::with_owner(model, owner),
        "Video published successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/{video_id}",
    tag = "Videos",
    operation_id = "getVideo",
    summary = "Get a video by ID",
    description = "Returns the video with its owner summary and counts the request as a view. Unpublished videos are only visible to their owner; everyone else gets 404.",
    params(("video_id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video details", body = ApiResponse<VideoResponse>),
        (status = 400, description = "Invalid video ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer), fields(video_id))]
pub async fn get_video(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<ApiResponse<VideoResponse>, AppError> {
    let id = parse_id(&video_id, "video")?;
    find_visible_video(&state.db, id, viewer.map(|u| u.user_id)).await?;

    let model = video::Entity::update_many()
        .col_expr(video::Column::Views, Expr::col(video::Column::Views).add(1))
        .filter(video::Column::Id.eq(id))
        .exec_with_returning(&state.db)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("Video not found".into()))?;

    let owner = load_summary(&state.db, model.owner_id).await?;
    Ok(ApiResponse::ok(
        VideoResponse::with_owner(model, owner),
        "Video fetched successfully",
    ))
}

#[utoipa::path(
    patch,
    path = "/{video_id}",
    tag = "Videos",
    operation_id = "updateVideo",
    summary = "Update a video",
    description = "Partially updates a video. Blank text fields keep their current value. A new `video` or `thumbnail` file replaces the stored one; the replaced object is deleted after the record is updated.",
    params(("video_id" = String, Path, description = "Video ID")),
    request_body(
        content_type = "multipart/form-data",
        description = "Optional fields: `title`, `description`, `video` (video/*), `thumbnail` (image/*)",
    ),
    responses(
        (status = 200, description = "Video updated", body = ApiResponse<VideoResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Media store failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(video_id))]
pub async fn update_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<ApiResponse<VideoResponse>, AppError> {
    let id = parse_id(&video_id, "video")?;
    let existing = find_video(&state.db, id).await?;
    ensure_owner(&existing, auth_user.user_id)?;

    let form = read_form(&mut multipart, state.config.storage.max_upload_size).await?;
    let mut errors = validate_video_text(form.text("title"), form.text("description"), false);
    let new_video = optional_file(&form, "video", MediaKind::Video, &mut errors);
    let new_thumb = optional_file(&form, "thumbnail", MediaKind::Image, &mut errors);
    if !errors.is_empty() {
        return Err(AppError::InvalidFields(errors));
    }

    let uploaded_video = match new_video {
        Some(file) => Some(store(&*state.media, file, MediaKind::Video).await?),
        None => None,
    };
    let uploaded_thumb = match new_thumb {
        Some(file) => match store(&*state.media, file, MediaKind::Image).await {
            Ok(u) => Some(u),
            Err(e) => {
                discard_all(&state, &uploaded_video.iter().collect::<Vec<_>>()).await;
                return Err(e);
            }
        },
        None => None,
    };

    // Only the assigned columns are written, so concurrent view increments
    // are not overwritten.
    let mut active: video::ActiveModel = existing.clone().into();
    if let Some(title) = form.text("title").map(str::trim).filter(|t| !t.is_empty()) {
        active.title = Set(title.to_string());
    }
    if let Some(description) = form
        .text("description")
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        active.description = Set(description.to_string());
    }
    if let Some(ref uploaded) = uploaded_video {
        active.video_url = Set(uploaded.url.clone());
        active.video_storage_id = Set(uploaded.storage_id.clone());
        if let Some(duration) = uploaded.duration {
            active.duration = Set(duration);
        }
    }
    if let Some(ref uploaded) = uploaded_thumb {
        active.thumbnail_url = Set(uploaded.url.clone());
        active.thumbnail_storage_id = Set(uploaded.storage_id.clone());
    }
    active.updated_at = Set(Utc::now());

    let model = match active.update(&state.db).await {
        Ok(m) => m,
        Err(e) => {
            let fresh: Vec<_> = uploaded_video.iter().chain(uploaded_thumb.iter()).collect();
            discard_all(&state, &fresh).await;
            return Err(e.into());
        }
    };

    if uploaded_video.is_some() {
        discard(&*state.media, &existing.video_storage_id).await;
    }
    if uploaded_thumb.is_some() {
        discard(&*state.media, &existing.thumbnail_storage_id).await;
    }

    let owner = load_summary(&state.db, model.owner_id).await?;
    Ok(ApiResponse::ok(
        VideoResponse::with_owner(model, owner),
        "Video updated successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/{video_id}",
    tag = "Videos",
    operation_id = "deleteVideo",
    summary = "Delete a video",
    description = "Deletes the video file and thumbnail from the media store, then removes the video together with its likes, its comments and their likes, and its playlist entries in one transaction. A media store failure aborts before anything is removed from the database.",
    params(("video_id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video deleted"),
        (status = 400, description = "Invalid video ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Media store failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id))]
pub async fn delete_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&video_id, "video")?;
    let existing = find_video(&state.db, id).await?;
    ensure_owner(&existing, auth_user.user_id)?;

    state.media.delete(&existing.video_storage_id).await?;
    state.media.delete(&existing.thumbnail_storage_id).await?;

    let txn = state.db.begin().await?;

    let comment_ids: Vec<Uuid> = comment::Entity::find()
        .select_only()
        .column(comment::Column::Id)
        .filter(comment::Column::VideoId.eq(id))
        .into_tuple()
        .all(&txn)
        .await?;

    like::Entity::delete_many()
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(like::Column::TargetKind.eq(like::LikeKind::Video))
                        .add(like::Column::TargetId.eq(id)),
                )
                .add(
                    Condition::all()
                        .add(like::Column::TargetKind.eq(like::LikeKind::Comment))
                        .add(like::Column::TargetId.is_in(comment_ids)),
                ),
        )
        .exec(&txn)
        .await?;

    comment::Entity::delete_many()
        .filter(comment::Column::VideoId.eq(id))
        .exec(&txn)
        .await?;

    playlist_video::Entity::delete_many()
        .filter(playlist_video::Column::VideoId.eq(id))
        .exec(&txn)
        .await?;

    video::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(video_id = %id, "Deleted video");
    Ok(ApiResponse::empty("Video deleted successfully"))
}

#[utoipa::path(
    patch,
    path = "/toggle/publish/{video_id}",
    tag = "Videos",
    operation_id = "togglePublishStatus",
    summary = "Publish or unpublish a video",
    description = "Flips `is_published` in a single update.",
    params(("video_id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Publish status flipped", body = ApiResponse<VideoResponse>),
        (status = 400, description = "Invalid video ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id))]
pub async fn toggle_publish_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<ApiResponse<VideoResponse>, AppError> {
    let id = parse_id(&video_id, "video")?;
    let existing = find_video(&state.db, id).await?;
    ensure_owner(&existing, auth_user.user_id)?;

    let model = video::Entity::update_many()
        .col_expr(
            video::Column::IsPublished,
            Expr::col(video::Column::IsPublished).not(),
        )
        .col_expr(video::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(video::Column::Id.eq(id))
        .exec_with_returning(&state.db)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("Video not found".into()))?;

    let state_word = if model.is_published {
        "published"
    } else {
        "unpublished"
    };
    tracing::info!(video_id = %id, "Video {}", state_word);

    let owner = load_summary(&state.db, model.owner_id).await?;
    Ok(ApiResponse::ok(
        VideoResponse::with_owner(model, owner),
        format!("Video {state_word} successfully"),
    ))
}

/// Body limit layer for the video routes: room for a video and a thumbnail
/// at the configured per-file maximum, plus the text fields.
pub fn upload_body_limit(max_file_size: u64) -> DefaultBodyLimit {
    let limit = max_file_size.saturating_mul(2).saturating_add(1024 * 1024);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}
