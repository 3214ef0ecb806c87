use axum::extract::{Path, Query, State};
use chrono::Utc;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{like, tweet};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::ApiResponse;
use crate::models::tweet::*;
use crate::models::user::UserSummary;
use crate::state::AppState;
use crate::utils::id::parse_id;
use crate::utils::lookup::{find_tweet, find_user};
use crate::utils::ownership::ensure_owner;
use crate::utils::pagination::{PageParams, PageQuery, fetch_page};
use crate::utils::users::load_summary;

#[utoipa::path(
    post,
    path = "/",
    tag = "Tweets",
    operation_id = "createTweet",
    summary = "Post a tweet",
    description = "Content must be 1-280 characters after trimming.",
    request_body = TweetRequest,
    responses(
        (status = 201, description = "Tweet created", body = ApiResponse<TweetResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_tweet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<TweetRequest>,
) -> Result<ApiResponse<TweetResponse>, AppError> {
    validate_tweet(&payload)?;

    let now = Utc::now();
    let model = tweet::ActiveModel {
        id: Set(Uuid::now_v7()),
        content: Set(payload.content.trim().to_string()),
        owner_id: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    let owner = load_summary(&state.db, model.owner_id).await?;
    Ok(ApiResponse::created(
        TweetResponse::with_owner(model, owner),
        "Tweet created successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = "Tweets",
    operation_id = "getUserTweets",
    summary = "List a user's tweets",
    description = "Newest first.",
    params(("user_id" = String, Path, description = "User ID"), PageQuery),
    responses(
        (status = 200, description = "Page of tweets", body = ApiResponse<TweetListResponse>),
        (status = 400, description = "Invalid user ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(user_id))]
pub async fn user_tweets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<TweetListResponse>, AppError> {
    let id = parse_id(&user_id, "user")?;
    let owner = find_user(&state.db, id).await?;

    let select = tweet::Entity::find()
        .filter(tweet::Column::OwnerId.eq(id))
        .order_by_desc(tweet::Column::CreatedAt)
        .order_by_desc(tweet::Column::Id);
    let (models, pagination) = fetch_page(&state.db, select, PageParams::from(&query)).await?;

    let owner = UserSummary::from(owner);
    let tweets = models
        .into_iter()
        .map(|m| TweetResponse::with_owner(m, Some(owner.clone())))
        .collect();

    Ok(ApiResponse::ok(
        TweetListResponse { tweets, pagination },
        "Tweets fetched successfully",
    ))
}

#[utoipa::path(
    patch,
    path = "/{tweet_id}",
    tag = "Tweets",
    operation_id = "updateTweet",
    summary = "Edit a tweet",
    params(("tweet_id" = String, Path, description = "Tweet ID")),
    request_body = TweetRequest,
    responses(
        (status = 200, description = "Tweet updated", body = ApiResponse<TweetResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Tweet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(tweet_id))]
pub async fn update_tweet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    AppJson(payload): AppJson<TweetRequest>,
) -> Result<ApiResponse<TweetResponse>, AppError> {
    let id = parse_id(&tweet_id, "tweet")?;
    validate_tweet(&payload)?;
    let existing = find_tweet(&state.db, id).await?;
    ensure_owner(&existing, auth_user.user_id)?;

    let mut active: tweet::ActiveModel = existing.into();
    active.content = Set(payload.content.trim().to_string());
    active.updated_at = Set(Utc::now());
    let model = active.update(&state.db).await?;

    let owner = load_summary(&state.db, model.owner_id).await?;
    Ok(ApiResponse::ok(
        TweetResponse::with_owner(model, owner),
        "Tweet updated successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/{tweet_id}",
    tag = "Tweets",
    operation_id = "deleteTweet",
    summary = "Delete a tweet",
    description = "Deletes the tweet and every like on it.",
    params(("tweet_id" = String, Path, description = "Tweet ID")),
    responses(
        (status = 200, description = "Tweet deleted"),
        (status = 400, description = "Invalid tweet ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Tweet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(tweet_id))]
pub async fn delete_tweet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&tweet_id, "tweet")?;
    let existing = find_tweet(&state.db, id).await?;
    ensure_owner(&existing, auth_user.user_id)?;

    let txn = state.db.begin().await?;
    like::Entity::delete_many()
        .filter(like::Column::TargetKind.eq(like::LikeKind::Tweet))
        .filter(like::Column::TargetId.eq(id))
        .exec(&txn)
        .await?;
    tweet::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(tweet_id = %id, "Deleted tweet");
    Ok(ApiResponse::empty("Tweet deleted successfully"))
}
