use axum::{extract::{Path, State}, http::StatusCode, Json};
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::promotion::{self, PromotionInput};
use service::db::promotion_service;

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::policy::{AdminPolicy, Authorized};
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/promotions/{code}", tag = "catalog", params(("code" = String, Path, description = "Promotion code, any case")), responses((status = 200, description = "Redeemable promotion"), (status = 404, description = "Unknown or not redeemable")))]
pub async fn lookup(State(state): State<ServerState>, Path(code): Path<String>) -> Result<Json<promotion::Model>, ApiError> {
    Ok(Json(promotion_service::find_redeemable(&state.db, &code).await?))
}

#[utoipa::path(get, path = "/api/admin/promotions", tag = "admin", responses((status = 200, description = "Promotions"), (status = 401, description = "Unauthorized")))]
pub async fn admin_list(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<Page<promotion::Model>>, ApiError> {
    Ok(Json(promotion_service::list_promotions(&state.db, p).await?))
}

#[utoipa::path(post, path = "/api/admin/promotions", tag = "admin", request_body = crate::openapi::PromotionRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 409, description = "Code taken")))]
pub async fn create(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    ApiJson(input): ApiJson<PromotionInput>,
) -> Result<(StatusCode, Json<promotion::Model>), ApiError> {
    let created = promotion_service::create_promotion(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/api/admin/promotions/{id}", tag = "admin", request_body = crate::openapi::PromotionRequest, params(("id" = Uuid, Path, description = "Promotion id")), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<PromotionInput>,
) -> Result<Json<promotion::Model>, ApiError> {
    Ok(Json(promotion_service::update_promotion(&state.db, id, input).await?))
}

#[utoipa::path(delete, path = "/api/admin/promotions/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Promotion id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    promotion_service::delete_promotion(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
