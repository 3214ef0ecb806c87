use std::time::Duration;

use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::entity::{comment, like, playlist, subscription, tweet, video};

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("tubehub::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite indexes, so we create them
/// manually on startup. The unique like index backs the toggle engine, so
/// failing to create it is fatal; the others only speed up lookups.
pub async fn ensure_indexes<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_like_actor_target")
        .table(like::Entity)
        .col(like::Column::LikedBy)
        .col(like::Column::TargetKind)
        .col(like::Column::TargetId)
        .to_owned();
    create_index(db, &stmt, "idx_like_actor_target").await?;

    let lookups = [
        // SELECT COUNT(*) FROM likes WHERE target_kind = ? AND target_id = ?
        (
            "idx_like_target",
            Index::create()
                .if_not_exists()
                .name("idx_like_target")
                .table(like::Entity)
                .col(like::Column::TargetKind)
                .col(like::Column::TargetId)
                .to_owned(),
        ),
        (
            "idx_video_owner_created",
            Index::create()
                .if_not_exists()
                .name("idx_video_owner_created")
                .table(video::Entity)
                .col(video::Column::OwnerId)
                .col(video::Column::CreatedAt)
                .to_owned(),
        ),
        (
            "idx_comment_video_created",
            Index::create()
                .if_not_exists()
                .name("idx_comment_video_created")
                .table(comment::Entity)
                .col(comment::Column::VideoId)
                .col(comment::Column::CreatedAt)
                .to_owned(),
        ),
        (
            "idx_tweet_owner_created",
            Index::create()
                .if_not_exists()
                .name("idx_tweet_owner_created")
                .table(tweet::Entity)
                .col(tweet::Column::OwnerId)
                .col(tweet::Column::CreatedAt)
                .to_owned(),
        ),
        (
            "idx_subscription_channel",
            Index::create()
                .if_not_exists()
                .name("idx_subscription_channel")
                .table(subscription::Entity)
                .col(subscription::Column::ChannelId)
                .to_owned(),
        ),
        (
            "idx_playlist_owner",
            Index::create()
                .if_not_exists()
                .name("idx_playlist_owner")
                .table(playlist::Entity)
                .col(playlist::Column::OwnerId)
                .to_owned(),
        ),
    ];

    for (name, stmt) in &lookups {
        if let Err(e) = create_index(db, stmt, name).await {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }

    Ok(())
}

async fn create_index<C: ConnectionTrait>(
    db: &C,
    stmt: &IndexCreateStatement,
    name: &str,
) -> Result<(), DbErr> {
    db.execute_unprepared(&stmt.to_string(PostgresQueryBuilder))
        .await?;
    info!("Ensured index {} exists", name);
    Ok(())
}
