use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QuerySelect, Select,
};
use serde::Deserialize;

use crate::models::shared::PageMeta;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Raw `page`/`limit` query parameters.
///
/// Kept as strings so that garbage input falls back to the defaults instead
/// of failing the request.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (1-based). Default: 1.
    #[param(example = "1")]
    pub page: Option<String>,
    /// Items per page, at most 100. Default: 10.
    #[param(example = "10")]
    pub limit: Option<String>,
}

/// Sanitized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageParams {
    /// Coerce raw values: absent, non-numeric and non-positive values take the
    /// default; `limit` is capped at [`MAX_LIMIT`].
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }

    /// Rows to skip. Clamped to what a Postgres BIGINT can hold.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }

    pub fn meta(&self, total: u64) -> PageMeta {
        PageMeta {
            total,
            page: self.page,
            limit: self.limit,
            total_pages: total.div_ceil(self.limit),
            has_next_page: total > self.page.saturating_mul(self.limit),
        }
    }
}

impl From<&PageQuery> for PageParams {
    fn from(q: &PageQuery) -> Self {
        Self::from_raw(q.page.as_deref(), q.limit.as_deref())
    }
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n as u64)
        .unwrap_or(default)
}

/// Run `select` twice over the same predicate: once for the total count and
/// once for the requested window.
pub async fn fetch_page<C, E>(
    db: &C,
    select: Select<E>,
    params: PageParams,
) -> Result<(Vec<E::Model>, PageMeta), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync,
{
    let total = select.clone().paginate(db, params.limit).num_items().await?;
    let items = select
        .offset(Some(params.offset()))
        .limit(Some(params.limit))
        .all(db)
        .await?;
    Ok((items, params.meta(total)))
}
