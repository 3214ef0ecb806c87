use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,
    pub description: String,

    /// Public URL of the media file and its id in the media store.
    pub video_url: String,
    pub video_storage_id: String,
    pub thumbnail_url: String,
    pub thumbnail_storage_id: String,

    /// Seconds. Zero when the media store could not tell.
    pub duration: f64,
    #[sea_orm(default_value = 0)]
    pub views: i64,
    #[sea_orm(default_value = true)]
    pub is_published: bool,

    pub owner_id: Uuid,
    #[sea_orm(belongs_to, from = "owner_id", to = "id")]
    pub owner: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::comment::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
