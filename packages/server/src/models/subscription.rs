use chrono::{DateTime, Utc};
use serde::Serialize;

use super::shared::PageMeta;
use super::user::UserSummary;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SubscriptionToggleResponse {
    /// Whether the actor follows the channel after the call.
    pub subscribed: bool,
    #[schema(example = 12)]
    pub subscriber_count: u64,
}

/// A user on the other side of a subscription, with when it started.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SubscriptionEntry {
    pub user: UserSummary,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SubscriberListResponse {
    pub subscribers: Vec<SubscriptionEntry>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ChannelListResponse {
    pub channels: Vec<SubscriptionEntry>,
    pub pagination: PageMeta,
}
