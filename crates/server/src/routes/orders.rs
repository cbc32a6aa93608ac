use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::order::{self, OrderStatus};
use service::db::order_service::{self, PlaceOrderInput};

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::metrics::ORDERS_PLACED_TOTAL;
use crate::policy::{AdminPolicy, Authorized, CustomerPolicy};
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: OrderStatus,
}

#[utoipa::path(post, path = "/api/orders", tag = "orders", request_body = crate::openapi::PlaceOrderRequest, responses((status = 201, description = "Order placed"), (status = 400, description = "Bad Request"), (status = 401, description = "Unauthorized")))]
pub async fn place(
    State(state): State<ServerState>,
    caller: Authorized<CustomerPolicy>,
    ApiJson(input): ApiJson<PlaceOrderInput>,
) -> Result<(StatusCode, Json<order::Model>), ApiError> {
    let placed = order_service::place_order(&state.db, caller.claims.sub, input).await?;
    ORDERS_PLACED_TOTAL.inc();
    Ok((StatusCode::CREATED, Json(placed)))
}

#[utoipa::path(get, path = "/api/orders", tag = "orders", responses((status = 200, description = "Caller's orders, newest first"), (status = 401, description = "Unauthorized")))]
pub async fn mine(
    State(state): State<ServerState>,
    caller: Authorized<CustomerPolicy>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<Page<order::Model>>, ApiError> {
    Ok(Json(order_service::list_for_user(&state.db, caller.claims.sub, p).await?))
}

#[utoipa::path(get, path = "/api/admin/orders", tag = "admin", params(("status" = Option<String>, Query, description = "Filter by status")), responses((status = 200, description = "Orders"), (status = 401, description = "Unauthorized")))]
pub async fn admin_list(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    ApiQuery(filter): ApiQuery<StatusFilter>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<Page<order::Model>>, ApiError> {
    Ok(Json(order_service::list_all(&state.db, filter.status, p).await?))
}

#[utoipa::path(patch, path = "/api/admin/orders/{id}/status", tag = "admin", request_body = crate::openapi::OrderStatusRequest, params(("id" = Uuid, Path, description = "Order id")), responses((status = 200, description = "Updated"), (status = 400, description = "Transition not allowed"), (status = 404, description = "Not Found")))]
pub async fn set_status(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<StatusInput>,
) -> Result<Json<order::Model>, ApiError> {
    Ok(Json(order_service::update_status(&state.db, id, input.status).await?))
}
