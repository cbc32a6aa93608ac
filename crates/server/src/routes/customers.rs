use axum::{extract::{Path, State}, Json};
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::user;
use service::db::customer_service::{self, CustomerDetail};

use crate::errors::ApiError;
use crate::extract::ApiQuery;
use crate::policy::{AdminPolicy, Authorized};
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/admin/customers", tag = "admin", responses((status = 200, description = "Customers, newest first"), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<Page<user::Model>>, ApiError> {
    Ok(Json(customer_service::list_customers(&state.db, p).await?))
}

#[utoipa::path(get, path = "/api/admin/customers/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Customer id")), responses((status = 200, description = "Customer with order summary"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    _caller: Authorized<AdminPolicy>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerDetail>, ApiError> {
    Ok(Json(customer_service::get_customer(&state.db, id).await?))
}
