//! Role policies as request extractors.
//!
//! A protected handler names its policy in its signature, e.g.
//! `Authorized<AdminPolicy>`; the check runs before the handler body and a
//! failure (missing, invalid or under-privileged token) is always `401`.

use std::marker::PhantomData;

use axum::{async_trait, extract::FromRequestParts, http::{header, request::Parts}};
use axum_extra::extract::cookie::CookieJar;
use models::user::Role;
use service::auth::domain::Claims;
use tracing::warn;

use crate::errors::ApiError;
use crate::routes::auth::{ServerState, AUTH_COOKIE};

pub trait Policy: Send + Sync + 'static {
    const NAME: &'static str;
    fn allows(role: Role) -> bool;
}

pub struct AdminPolicy;
pub struct SuperAdminPolicy;
pub struct CustomerPolicy;
pub struct AffiliatePolicy;

impl Policy for AdminPolicy {
    const NAME: &'static str = "admin";
    fn allows(role: Role) -> bool {
        matches!(role, Role::Admin | Role::SuperAdmin)
    }
}

impl Policy for SuperAdminPolicy {
    const NAME: &'static str = "super_admin";
    fn allows(role: Role) -> bool {
        role == Role::SuperAdmin
    }
}

/// Any signed-in account.
impl Policy for CustomerPolicy {
    const NAME: &'static str = "customer";
    fn allows(_role: Role) -> bool {
        true
    }
}

impl Policy for AffiliatePolicy {
    const NAME: &'static str = "affiliate";
    fn allows(role: Role) -> bool {
        matches!(role, Role::Affiliate | Role::Admin | Role::SuperAdmin)
    }
}

/// Verified caller whose role satisfies `P`.
pub struct Authorized<P: Policy> {
    pub claims: Claims,
    _policy: PhantomData<P>,
}

/// `Authorization: Bearer` first, then the `auth_token` cookie.
fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return value.strip_prefix("Bearer ").map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    }
    CookieJar::from_headers(&parts.headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl<P: Policy> FromRequestParts<ServerState> for Authorized<P> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_owned();
        let token = token_from_parts(parts).ok_or_else(|| {
            warn!(%path, policy = P::NAME, "missing bearer token and auth cookie");
            ApiError::Unauthorized
        })?;
        let claims = state.auth.verify_token(&token).map_err(|_| {
            warn!(%path, policy = P::NAME, "token validation failed");
            ApiError::Unauthorized
        })?;
        if !P::allows(claims.role) {
            warn!(%path, policy = P::NAME, user_id = %claims.sub, role = %claims.role, "role not permitted");
            return Err(ApiError::Unauthorized);
        }
        Ok(Authorized { claims, _policy: PhantomData })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    #[test]
    fn policies_cover_expected_roles() {
        assert!(AdminPolicy::allows(Role::SuperAdmin));
        assert!(!AdminPolicy::allows(Role::Affiliate));
        assert!(!SuperAdminPolicy::allows(Role::Admin));
        assert!(CustomerPolicy::allows(Role::Customer));
        assert!(AffiliatePolicy::allows(Role::Affiliate));
        assert!(!AffiliatePolicy::allows(Role::Customer));
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let p = parts(
            Request::builder()
                .header("authorization", "Bearer header-token")
                .header("cookie", "auth_token=cookie-token")
                .body(())
                .unwrap(),
        );
        assert_eq!(token_from_parts(&p).as_deref(), Some("header-token"));
    }

    #[test]
    fn cookie_is_used_without_header() {
        let p = parts(Request::builder().header("cookie", "theme=dark; auth_token=cookie-token").body(()).unwrap());
        assert_eq!(token_from_parts(&p).as_deref(), Some("cookie-token"));
        let p = parts(Request::builder().header("authorization", "Basic abc").body(()).unwrap());
        assert_eq!(token_from_parts(&p), None);
    }
}
