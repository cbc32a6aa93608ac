use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::affiliate::{self, AffiliateInput};
use service::db::affiliate_service::{self, AffiliateStats};

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::policy::{AdminPolicy, AffiliatePolicy, Authorized};
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct TrackInput {
    pub code: String,
}

#[utoipa::path(post, path = "/api/affiliates/track", tag = "affiliates", request_body = crate::openapi::TrackRequest, responses((status = 204, description = "Click recorded"), (status = 404, description = "Unknown or inactive code")))]
pub async fn track(State(state): State<ServerState>, ApiJson(input): ApiJson<TrackInput>) -> Result<StatusCode, ApiError> {
    affiliate_service::track_click(&state.db, &input.code).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/affiliates/me", tag = "affiliates", responses((status = 200, description = "Own affiliate stats"), (status = 401, description = "Unauthorized"), (status = 404, description = "No affiliate record linked")))]
pub async fn me(State(state): State<ServerState>, caller: Authorized<AffiliatePolicy>) -> Result<Json<AffiliateStats>, ApiError> {
    Ok(Json(affiliate_service::stats_for_user(&state.db, caller.claims.sub).await?))
}

#[utoipa::path(get, path = "/api/admin/affiliates", tag = "admin", responses((status = 200, description = "Affiliates"), (status = 401, description = "Unauthorized")))]
pub async fn admin_list(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<Page<affiliate::Model>>, ApiError> {
    Ok(Json(affiliate_service::list_affiliates(&state.db, p).await?))
}

#[utoipa::path(post, path = "/api/admin/affiliates", tag = "admin", request_body = crate::openapi::AffiliateRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 409, description = "Code taken")))]
pub async fn create(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    ApiJson(input): ApiJson<AffiliateInput>,
) -> Result<(StatusCode, Json<affiliate::Model>), ApiError> {
    let created = affiliate_service::create_affiliate(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/api/admin/affiliates/{id}", tag = "admin", request_body = crate::openapi::AffiliateRequest, params(("id" = Uuid, Path, description = "Affiliate id")), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<AffiliateInput>,
) -> Result<Json<affiliate::Model>, ApiError> {
    Ok(Json(affiliate_service::update_affiliate(&state.db, id, input).await?))
}

#[utoipa::path(delete, path = "/api/admin/affiliates/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Affiliate id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    affiliate_service::delete_affiliate(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
