use axum::extract::{Path, Query, State};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::subscription;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::shared::{ApiResponse, PageMeta};
use crate::models::subscription::*;
use crate::state::AppState;
use crate::utils::id::parse_id;
use crate::utils::lookup::{find_channel, find_user};
use crate::utils::pagination::{PageParams, PageQuery, fetch_page};
use crate::utils::toggle::{SubscriptionRelation, toggle};
use crate::utils::users::load_summaries;

#[utoipa::path(
    post,
    path = "/c/{channel_id}",
    tag = "Subscriptions",
    operation_id = "toggleSubscription",
    summary = "Subscribe to or unsubscribe from a channel",
    description = "Removes the caller's subscription if present, otherwise adds it. Responds 201 when now subscribed and 200 when not. Subscribing to yourself is rejected before anything is looked up.",
    params(("channel_id" = String, Path, description = "Channel (user) ID")),
    responses(
        (status = 200, description = "Unsubscribed", body = ApiResponse<SubscriptionToggleResponse>),
        (status = 201, description = "Subscribed", body = ApiResponse<SubscriptionToggleResponse>),
        (status = 400, description = "Invalid channel ID or self-subscription (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Channel not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already subscribed (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(channel_id))]
pub async fn toggle_subscription(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<ApiResponse<SubscriptionToggleResponse>, AppError> {
    let channel = parse_id(&channel_id, "channel")?;
    if channel == auth_user.user_id {
        return Err(AppError::Validation(
            "You cannot subscribe to yourself".into(),
        ));
    }
    find_channel(&state.db, channel).await?;

    let relation = SubscriptionRelation {
        subscriber: auth_user.user_id,
        channel,
    };
    let outcome = toggle(&state.db, &relation).await?;
    tracing::info!(
        channel_id = %channel,
        subscribed = outcome.active,
        subscriber_count = outcome.count,
        "Subscription toggled"
    );

    let data = SubscriptionToggleResponse {
        subscribed: outcome.active,
        subscriber_count: outcome.count,
    };
    Ok(if outcome.active {
        ApiResponse::created(data, "Subscribed successfully")
    } else {
        ApiResponse::ok(data, "Unsubscribed successfully")
    })
}

/// Page through subscriptions matching `filter`, resolving the user on the
/// side picked by `other`.
async fn subscription_page(
    state: &AppState,
    filter: Condition,
    other: fn(&subscription::Model) -> Uuid,
    params: PageParams,
) -> Result<(Vec<SubscriptionEntry>, PageMeta), AppError> {
    let select = subscription::Entity::find()
        .filter(filter)
        .order_by_desc(subscription::Column::CreatedAt)
        .order_by_desc(subscription::Column::SubscriberId)
        .order_by_desc(subscription::Column::ChannelId);
    let (rows, pagination) = fetch_page(&state.db, select, params).await?;

    let users = load_summaries(&state.db, rows.iter().map(other)).await?;
    let entries = rows
        .iter()
        .filter_map(|row| {
            Some(SubscriptionEntry {
                user: users.get(&other(row))?.clone(),
                subscribed_at: row.created_at,
            })
        })
        .collect();
    Ok((entries, pagination))
}

#[utoipa::path(
    get,
    path = "/c/{channel_id}",
    tag = "Subscriptions",
    operation_id = "getChannelSubscribers",
    summary = "List a channel's subscribers",
    description = "Most recent subscribers first.",
    params(("channel_id" = String, Path, description = "Channel (user) ID"), PageQuery),
    responses(
        (status = 200, description = "Page of subscribers", body = ApiResponse<SubscriberListResponse>),
        (status = 400, description = "Invalid channel ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Channel not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(channel_id))]
pub async fn channel_subscribers(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<SubscriberListResponse>, AppError> {
    let channel = parse_id(&channel_id, "channel")?;
    find_channel(&state.db, channel).await?;

    let (subscribers, pagination) = subscription_page(
        &state,
        Condition::all().add(subscription::Column::ChannelId.eq(channel)),
        |s| s.subscriber_id,
        PageParams::from(&query),
    )
    .await?;

    Ok(ApiResponse::ok(
        SubscriberListResponse {
            subscribers,
            pagination,
        },
        "Subscribers fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/u/{subscriber_id}",
    tag = "Subscriptions",
    operation_id = "getSubscribedChannels",
    summary = "List channels a user subscribes to",
    description = "Most recent subscriptions first.",
    params(("subscriber_id" = String, Path, description = "Subscriber (user) ID"), PageQuery),
    responses(
        (status = 200, description = "Page of channels", body = ApiResponse<ChannelListResponse>),
        (status = 400, description = "Invalid subscriber ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(subscriber_id))]
pub async fn subscribed_channels(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<ChannelListResponse>, AppError> {
    let subscriber = parse_id(&subscriber_id, "subscriber")?;
    find_user(&state.db, subscriber).await?;

    let (channels, pagination) = subscription_page(
        &state,
        Condition::all().add(subscription::Column::SubscriberId.eq(subscriber)),
        |s| s.channel_id,
        PageParams::from(&query),
    )
    .await?;

    Ok(ApiResponse::ok(
        ChannelListResponse {
            channels,
            pagination,
        },
        "Subscribed channels fetched successfully",
    ))
}
