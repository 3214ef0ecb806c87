use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A registered account. Viewed as a content owner it is a "channel".
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,

    #[sea_orm(has_many)]
    pub videos: HasMany<super::video::Entity>,

    #[sea_orm(has_many)]
    pub tweets: HasMany<super::tweet::Entity>,

    #[sea_orm(has_many)]
    pub playlists: HasMany<super::playlist::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
