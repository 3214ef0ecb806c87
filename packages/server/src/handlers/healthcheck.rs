use axum::extract::State;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::shared::ApiResponse;
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthStatus {
    #[schema(example = "OK")]
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Healthcheck",
    operation_id = "healthcheck",
    summary = "Check service health",
    description = "Pings the database. Succeeds only when the connection pool can reach it.",
    responses(
        (status = 200, description = "Service is healthy", body = ApiResponse<HealthStatus>),
        (status = 500, description = "Database unreachable (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn healthcheck(
    State(state): State<AppState>,
) -> Result<ApiResponse<HealthStatus>, AppError> {
    state.db.ping().await?;
    Ok(ApiResponse::ok(HealthStatus { status: "OK" }, "Health check passed"))
}
