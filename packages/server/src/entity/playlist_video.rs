use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership of a video in a playlist. The composite key gives set semantics;
/// `position` keeps insertion order.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "playlist_video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub playlist_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub video_id: Uuid,
    #[sea_orm(belongs_to, from = "playlist_id", to = "id")]
    pub playlist: HasOne<super::playlist::Entity>,
    #[sea_orm(belongs_to, from = "video_id", to = "id")]
    pub video: HasOne<super::video::Entity>,

    #[sea_orm(default_value = 0)]
    pub position: i32,

    pub added_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
