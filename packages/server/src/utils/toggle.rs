use sea_orm::sea_query::Condition;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::{like, subscription};
use crate::error::{AppError, is_unique_violation};

/// Result of flipping a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Whether the relation exists after the call.
    pub active: bool,
    /// Number of relations pointing at the target after the call.
    pub count: u64,
}

/// An (actor, target) relation that at most one row may represent.
///
/// Uniqueness is enforced by the schema: a unique index or composite primary
/// key over exactly the columns matched by [`Toggle::pair`].
pub trait Toggle {
    type Entity: EntityTrait;

    /// Matches the single row for this (actor, target) pair.
    fn pair(&self) -> Condition;
    /// Matches every row pointing at the target, whoever the actor is.
    fn target(&self) -> Condition;
    fn new_record(&self) -> <Self::Entity as EntityTrait>::ActiveModel;
    /// Message for the loser of a concurrent insert race.
    fn conflict_message(&self) -> &'static str;
}

/// Remove the relation if present, otherwise create it, then recount.
///
/// The delete doubles as the existence check: a non-zero affected-row count
/// means the relation was there. A concurrent toggle that inserts first makes
/// our insert hit the unique constraint, which surfaces as `Conflict`.
pub async fn toggle<C, T>(db: &C, relation: &T) -> Result<ToggleOutcome, AppError>
where
    C: ConnectionTrait,
    T: Toggle,
    <T::Entity as EntityTrait>::Model: FromQueryResult + Sized + Send + Sync,
{
    let removed = T::Entity::delete_many()
        .filter(relation.pair())
        .exec(db)
        .await?;

    let active = if removed.rows_affected > 0 {
        false
    } else {
        insert_relation(db, relation).await?;
        true
    };

    let count = T::Entity::find()
        .filter(relation.target())
        .count(db)
        .await?;

    Ok(ToggleOutcome { active, count })
}

/// Insert the relation row, mapping a uniqueness violation to `Conflict`.
pub async fn insert_relation<C, T>(db: &C, relation: &T) -> Result<(), AppError>
where
    C: ConnectionTrait,
    T: Toggle,
{
    match T::Entity::insert(relation.new_record())
        .exec_without_returning(db)
        .await
    {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::Conflict(relation.conflict_message().into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// `actor` likes `target`.
pub struct LikeRelation {
    pub actor: Uuid,
    pub target: like::LikeTarget,
}

impl Toggle for LikeRelation {
    type Entity = like::Entity;

    fn pair(&self) -> Condition {
        self.target().add(like::Column::LikedBy.eq(self.actor))
    }

    fn target(&self) -> Condition {
        Condition::all()
            .add(like::Column::TargetKind.eq(self.target.kind()))
            .add(like::Column::TargetId.eq(self.target.id()))
    }

    fn new_record(&self) -> like::ActiveModel {
        like::ActiveModel {
            id: Set(Uuid::now_v7()),
            liked_by: Set(self.actor),
            target_kind: Set(self.target.kind()),
            target_id: Set(self.target.id()),
            created_at: Set(chrono::Utc::now()),
        }
    }

    fn conflict_message(&self) -> &'static str {
        "Already liked"
    }
}

/// `subscriber` follows `channel`.
pub struct SubscriptionRelation {
    pub subscriber: Uuid,
    pub channel: Uuid,
}

impl Toggle for SubscriptionRelation {
    type Entity = subscription::Entity;

    fn pair(&self) -> Condition {
        self.target().add(subscription::Column::SubscriberId.eq(self.subscriber))
    }

    fn target(&self) -> Condition {
        Condition::all().add(subscription::Column::ChannelId.eq(self.channel))
    }

    fn new_record(&self) -> subscription::ActiveModel {
        subscription::ActiveModel {
            subscriber_id: Set(self.subscriber),
            channel_id: Set(self.channel),
            created_at: Set(chrono::Utc::now()),
        }
    }

    fn conflict_message(&self) -> &'static str {
        "Already subscribed"
    }
}
