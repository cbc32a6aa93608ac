use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::meal::{self, MealInput};
use service::db::meal_service;

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::policy::{AdminPolicy, Authorized};
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    pub category: Option<String>,
}

#[utoipa::path(get, path = "/api/meals", tag = "catalog", params(("category" = Option<String>, Query, description = "Only this category")), responses((status = 200, description = "Active meals")))]
pub async fn list(State(state): State<ServerState>, ApiQuery(params): ApiQuery<CatalogParams>) -> Result<Json<Vec<meal::Model>>, ApiError> {
    Ok(Json(meal_service::list_active(&state.db, params.category.as_deref()).await?))
}

#[utoipa::path(get, path = "/api/meals/{slug}", tag = "catalog", params(("slug" = String, Path, description = "Meal slug")), responses((status = 200, description = "Meal"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(slug): Path<String>) -> Result<Json<meal::Model>, ApiError> {
    Ok(Json(meal_service::get_active_by_slug(&state.db, &slug).await?))
}

#[utoipa::path(get, path = "/api/admin/meals", tag = "admin", responses((status = 200, description = "All meals"), (status = 401, description = "Unauthorized")))]
pub async fn admin_list(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<Page<meal::Model>>, ApiError> {
    Ok(Json(meal_service::list_all(&state.db, p).await?))
}

#[utoipa::path(post, path = "/api/admin/meals", tag = "admin", request_body = crate::openapi::MealRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 409, description = "Slug taken")))]
pub async fn create(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    ApiJson(input): ApiJson<MealInput>,
) -> Result<(StatusCode, Json<meal::Model>), ApiError> {
    let created = meal_service::create_meal(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/api/admin/meals/{id}", tag = "admin", request_body = crate::openapi::MealRequest, params(("id" = Uuid, Path, description = "Meal id")), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<MealInput>,
) -> Result<Json<meal::Model>, ApiError> {
    Ok(Json(meal_service::update_meal(&state.db, id, input).await?))
}

#[utoipa::path(delete, path = "/api/admin/meals/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Meal id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    meal_service::delete_meal(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
