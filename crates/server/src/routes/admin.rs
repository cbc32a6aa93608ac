use axum::{extract::State, Json};

use service::db::stats_service::{self, DashboardStats};

use crate::errors::ApiError;
use crate::policy::{AdminPolicy, Authorized};
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/admin/stats", tag = "admin", responses((status = 200, description = "Dashboard counters"), (status = 401, description = "Unauthorized")))]
pub async fn stats(State(state): State<ServerState>, _caller: Authorized<AdminPolicy>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(stats_service::dashboard(&state.db).await?))
}
