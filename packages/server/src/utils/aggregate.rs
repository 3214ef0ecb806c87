//! Single-statement aggregations.
//!
//! Each query computes its counts inside the database and returns the page
//! together with the total in one round trip, so both come from the same
//! snapshot. Paged queries always yield at least one row: the total is joined
//! laterally with the (possibly empty) page, leaving the page columns NULL
//! when nothing matched.

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DbBackend, DbErr, FromQueryResult, Statement};
use uuid::Uuid;

use crate::models::dashboard::{ChannelStats, ChannelVideo};
use crate::models::playlist::PlaylistSummary;
use crate::models::shared::PageMeta;
use crate::utils::pagination::PageParams;

/// A channel with no videos reports zero for every figure, subscribers
/// included, because the statistics are grouped over the channel's videos.
const CHANNEL_STATS_SQL: &str = r#"
WITH owned AS (
    SELECT v.id,
           v.views,
           (SELECT COUNT(*) FROM likes l
             WHERE l.target_kind = 'video' AND l.target_id = v.id) AS like_count
      FROM video v
     WHERE v.owner_id = $1
)
SELECT COUNT(*)::BIGINT                     AS total_videos,
       COALESCE(SUM(owned.views), 0)::BIGINT      AS total_views,
       COALESCE(SUM(owned.like_count), 0)::BIGINT AS total_likes,
       (CASE WHEN COUNT(*) = 0 THEN 0
             ELSE (SELECT COUNT(*) FROM subscription s WHERE s.channel_id = $1)
        END)::BIGINT                        AS total_subscribers
  FROM owned
"#;

/// `$4` is the viewer; unpublished videos are only listed for their owner.
const CHANNEL_VIDEOS_SQL: &str = r#"
WITH filtered AS (
    SELECT v.id,
           v.title,
           v.description,
           v.thumbnail_url,
           v.duration,
           v.views,
           v.is_published,
           v.created_at,
           (SELECT COUNT(*) FROM likes l
             WHERE l.target_kind = 'video' AND l.target_id = v.id) AS like_count,
           (SELECT COUNT(*) FROM comment c WHERE c.video_id = v.id) AS comment_count
      FROM video v
     WHERE v.owner_id = $1
       AND (v.is_published OR v.owner_id = $4)
),
meta AS (
    SELECT COUNT(*)::BIGINT AS total FROM filtered
)
SELECT meta.total, paged.*
  FROM meta
  LEFT JOIN LATERAL (
        SELECT * FROM filtered
         ORDER BY created_at DESC, id DESC
        OFFSET $2 LIMIT $3
  ) paged ON TRUE
 ORDER BY paged.created_at DESC NULLS LAST, paged.id DESC
"#;

const USER_PLAYLISTS_SQL: &str = r#"
WITH filtered AS (
    SELECT p.id,
           p.name,
           p.description,
           p.owner_id,
           p.created_at,
           p.updated_at,
           (SELECT COUNT(*) FROM playlist_video pv WHERE pv.playlist_id = p.id) AS video_count
      FROM playlist p
     WHERE p.owner_id = $1
),
meta AS (
    SELECT COUNT(*)::BIGINT AS total FROM filtered
)
SELECT meta.total, paged.*
  FROM meta
  LEFT JOIN LATERAL (
        SELECT * FROM filtered
         ORDER BY updated_at DESC, id DESC
        OFFSET $2 LIMIT $3
  ) paged ON TRUE
 ORDER BY paged.updated_at DESC NULLS LAST, paged.id DESC
"#;

pub async fn channel_stats<C: ConnectionTrait>(
    db: &C,
    channel_id: Uuid,
) -> Result<ChannelStats, DbErr> {
    let stats = ChannelStats::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        CHANNEL_STATS_SQL,
        [channel_id.into()],
    ))
    .one(db)
    .await?;
    Ok(stats.unwrap_or_default())
}

#[derive(Debug, FromQueryResult)]
struct ChannelVideoRow {
    total: i64,
    id: Option<Uuid>,
    title: Option<String>,
    description: Option<String>,
    thumbnail_url: Option<String>,
    duration: Option<f64>,
    views: Option<i64>,
    is_published: Option<bool>,
    like_count: Option<i64>,
    comment_count: Option<i64>,
    created_at: Option<DateTime<Utc>>,
}

impl ChannelVideoRow {
    /// `None` for the placeholder row of an empty page.
    fn into_video(self) -> Option<ChannelVideo> {
        Some(ChannelVideo {
            id: self.id?,
            title: self.title?,
            description: self.description.unwrap_or_default(),
            thumbnail_url: self.thumbnail_url.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
            views: self.views.unwrap_or_default(),
            is_published: self.is_published.unwrap_or_default(),
            like_count: self.like_count.unwrap_or_default(),
            comment_count: self.comment_count.unwrap_or_default(),
            created_at: self.created_at?,
        })
    }
}

/// A page of the channel's videos annotated with like and comment counts.
pub async fn channel_videos<C: ConnectionTrait>(
    db: &C,
    channel_id: Uuid,
    viewer: Option<Uuid>,
    params: PageParams,
) -> Result<(Vec<ChannelVideo>, PageMeta), DbErr> {
    let rows = ChannelVideoRow::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        CHANNEL_VIDEOS_SQL,
        [
            channel_id.into(),
            (params.offset() as i64).into(),
            (params.limit as i64).into(),
            viewer.into(),
        ],
    ))
    .all(db)
    .await?;

    let total = rows.first().map_or(0, |r| r.total.max(0) as u64);
    let videos = rows
        .into_iter()
        .filter_map(ChannelVideoRow::into_video)
        .collect();
    Ok((videos, params.meta(total)))
}

#[derive(Debug, FromQueryResult)]
struct PlaylistRow {
    total: i64,
    id: Option<Uuid>,
    name: Option<String>,
    description: Option<String>,
    owner_id: Option<Uuid>,
    video_count: Option<i64>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl PlaylistRow {
    fn into_summary(self) -> Option<PlaylistSummary> {
        Some(PlaylistSummary {
            id: self.id?,
            name: self.name?,
            description: self.description.unwrap_or_default(),
            owner_id: self.owner_id?,
            video_count: self.video_count.unwrap_or_default(),
            created_at: self.created_at?,
            updated_at: self.updated_at?,
        })
    }
}

/// A page of the user's playlists, most recently updated first, with the
/// number of videos in each.
pub async fn user_playlists<C: ConnectionTrait>(
    db: &C,
    owner_id: Uuid,
    params: PageParams,
) -> Result<(Vec<PlaylistSummary>, PageMeta), DbErr> {
    let rows = PlaylistRow::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        USER_PLAYLISTS_SQL,
        [
            owner_id.into(),
            (params.offset() as i64).into(),
            (params.limit as i64).into(),
        ],
    ))
    .all(db)
    .await?;

    let total = rows.first().map_or(0, |r| r.total.max(0) as u64);
    let playlists = rows
        .into_iter()
        .filter_map(PlaylistRow::into_summary)
        .collect();
    Ok((playlists, params.meta(total)))
}
