use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entity::user;
use crate::models::user::UserSummary;

/// Load public summaries for a set of users in one query.
///
/// Ids without a matching row are simply absent from the map.
pub async fn load_summaries<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, UserSummary>, DbErr> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(users
        .into_iter()
        .map(|u| (u.id, UserSummary::from(u)))
        .collect())
}

/// Single-user variant of [`load_summaries`].
pub async fn load_summary<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<UserSummary>, DbErr> {
    Ok(user::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(UserSummary::from))
}
