use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::block::Block;
use models::page_content;

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::metrics::{PAGE_LOADS_TOTAL, PAGE_SAVES_TOTAL};
use crate::policy::{AdminPolicy, Authorized};
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct LoadParams {
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoadOutput {
    pub blocks: Vec<Block>,
}

/// Both fields optional here so a missing one is a 400 with a stable message.
#[derive(Debug, Deserialize)]
pub struct SaveInput {
    pub page: Option<String>,
    pub blocks: Option<Vec<Block>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutput {
    pub success: bool,
    pub page_content: page_content::Model,
}

#[utoipa::path(get, path = "/api/page-editor", tag = "page-editor", params(("page" = String, Query, description = "Page identifier")), responses((status = 200, description = "Stored blocks, empty when never saved"), (status = 400, description = "Missing page"), (status = 500, description = "Store failure")))]
pub async fn load(State(state): State<ServerState>, ApiQuery(params): ApiQuery<LoadParams>) -> Result<Json<LoadOutput>, ApiError> {
    let blocks = state
        .pages
        .load(params.page.as_deref())
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to load page content"))?;
    PAGE_LOADS_TOTAL.inc();
    Ok(Json(LoadOutput { blocks }))
}

#[utoipa::path(post, path = "/api/page-editor", tag = "page-editor", request_body = crate::openapi::SavePageRequest, responses((status = 200, description = "Saved document"), (status = 400, description = "Missing page or blocks"), (status = 401, description = "Unauthorized"), (status = 500, description = "Store failure")))]
pub async fn save(
    State(state): State<ServerState>,
    caller: Authorized<AdminPolicy>,
    ApiJson(input): ApiJson<SaveInput>,
) -> Result<Json<SaveOutput>, ApiError> {
    let saved = state
        .pages
        .save(input.page, input.blocks)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to save page content"))?;
    PAGE_SAVES_TOTAL.inc();
    info!(event = "page_saved", page = %saved.page, by = %caller.claims.sub);
    Ok(Json(SaveOutput { success: true, page_content: saved }))
}
