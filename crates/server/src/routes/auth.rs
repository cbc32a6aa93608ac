use std::sync::Arc;

use axum::{extract::{Path, State}, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use models::user::Role;
use service::auth::{
    domain::{AuthUser, LoginInput, RegisterInput},
    errors::AuthError,
    repo::SeaOrmAuthRepository,
    repository::AuthRepository,
    AuthConfig, AuthService,
};
use service::page_content::{repository::{PageContentRepository, SeaOrmPageContentRepository}, PageContentService};

use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::policy::{Authorized, CustomerPolicy, SuperAdminPolicy};

pub const AUTH_COOKIE: &str = "auth_token";

/// Shared handler state: the pool plus the services built on top of it.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: AuthService<dyn AuthRepository>,
    pub pages: PageContentService,
}

impl ServerState {
    /// State wired to SeaORM repositories over `db`.
    pub fn new(db: DatabaseConnection, auth_cfg: AuthConfig) -> Self {
        let auth_repo: Arc<dyn AuthRepository> = Arc::new(SeaOrmAuthRepository { db: db.clone() });
        let page_repo: Arc<dyn PageContentRepository> = Arc::new(SeaOrmPageContentRepository { db: db.clone() });
        Self { db, auth: AuthService::new(auth_repo, auth_cfg), pages: PageContentService::new(page_repo) }
    }
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user: AuthUser,
    pub token: String,
    pub expires_at: i64,
}

#[derive(Deserialize)]
pub struct SetRoleInput {
    pub role: Role,
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, ApiJson(input): ApiJson<RegisterInput>) -> Result<(StatusCode, Json<AuthUser>), ApiError> {
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, ApiJson(input): ApiJson<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), ApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let out = LoginOutput { user: session.user, token: session.token, expires_at: session.expires_at };
    Ok((jar.add(cookie), Json(out)))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/auth/me", tag = "auth", responses((status = 200, description = "Current user"), (status = 401, description = "Unauthorized")))]
pub async fn me(State(state): State<ServerState>, caller: Authorized<CustomerPolicy>) -> Result<Json<AuthUser>, ApiError> {
    // A token can outlive its account.
    let user = state.auth.find_user(caller.claims.sub).await.map_err(|e| match e {
        AuthError::NotFound => ApiError::Unauthorized,
        other => other.into(),
    })?;
    Ok(Json(user))
}

#[utoipa::path(patch, path = "/api/admin/users/{id}/role", tag = "admin", request_body = crate::openapi::SetRoleRequest, params(("id" = Uuid, Path, description = "User id")), responses((status = 200, description = "Role changed"), (status = 401, description = "Unauthorized"), (status = 404, description = "Not Found")))]
pub async fn set_role(
    State(state): State<ServerState>,
    caller: Authorized<SuperAdminPolicy>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<SetRoleInput>,
) -> Result<Json<AuthUser>, ApiError> {
    let user = state.auth.set_role(id, input.role).await?;
    info!(event = "role_assigned", by = %caller.claims.sub, user_id = %user.id, role = %user.role);
    Ok(Json(user))
}
