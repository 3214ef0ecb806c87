use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of record a like points at.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum LikeKind {
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "comment")]
    Comment,
    #[sea_orm(string_value = "tweet")]
    Tweet,
}

/// The single target of a like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Video(Uuid),
    Comment(Uuid),
    Tweet(Uuid),
}

impl LikeTarget {
    pub fn kind(self) -> LikeKind {
        match self {
            LikeTarget::Video(_) => LikeKind::Video,
            LikeTarget::Comment(_) => LikeKind::Comment,
            LikeTarget::Tweet(_) => LikeKind::Tweet,
        }
    }

    pub fn id(self) -> Uuid {
        match self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Tweet(id) => id,
        }
    }
}

/// `(liked_by, target_kind, target_id)` is unique; the index is created by
/// `database::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "likes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub liked_by: Uuid,
    pub target_kind: LikeKind,
    pub target_id: Uuid,

    pub created_at: DateTimeUtc,
}

impl Model {
    pub fn target(&self) -> LikeTarget {
        match self.target_kind {
            LikeKind::Video => LikeTarget::Video(self.target_id),
            LikeKind::Comment => LikeTarget::Comment(self.target_id),
            LikeKind::Tweet => LikeTarget::Tweet(self.target_id),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
