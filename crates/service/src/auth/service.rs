use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::user::{self, Role};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

impl AuthConfig {
    pub fn from_app(cfg: &configs::AuthConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            token_ttl_hours: cfg.token_ttl_hours,
            password_algorithm: "argon2".into(),
        }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository + ?Sized> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self { repo: self.repo.clone(), cfg: self.cfg.clone() }
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

fn check_password(password: &str) -> Result<(), AuthError> {
    if password.len() < 8 {
        return Err(AuthError::Validation("password too short (>=8)".into()));
    }
    Ok(())
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new customer with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 1, password_algorithm: "argon2".into() });
    /// let input = RegisterInput { email: "User@Example.com".into(), name: "Test".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        let email = user::validate_email(&input.email)?;
        user::validate_name(&input.name)?;
        check_password(&input.password)?;
        if let Some(existing) = self.repo.find_user_by_email(&email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let hash = hash_password(&input.password)?;
        let user = self.repo.create_user(&email, input.name.trim(), Role::Customer).await?;
        self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(event = "user_registered", user_id = %user.id, email = %user.email);
        Ok(user)
    }

    /// Authenticate a user and issue a signed token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 1, password_algorithm: "argon2".into() });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), name: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = input.email.trim().to_lowercase();
        let user = self.repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            warn!(event = "login_failed", user_id = %user.id);
            return Err(AuthError::Unauthorized);
        }

        let (token, expires_at) = self.issue_token(&user)?;
        info!(event = "login_succeeded", user_id = %user.id, role = %user.role);
        Ok(AuthSession { user, token, expires_at })
    }

    /// Sign a token for `user`; returns it with its expiry (unix seconds).
    pub fn issue_token(&self, user: &AuthUser) -> Result<(String, i64), AuthError> {
        let now = chrono::Utc::now();
        let exp = (now + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp();
        let claims = Claims { sub: user.id, email: user.email.clone(), role: user.role, iat: now.timestamp(), exp };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok((token, exp))
    }

    /// Check signature and expiry. Any failure is reported as `Unauthorized`.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()), &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AuthError::Unauthorized
            })
    }

    pub async fn find_user(&self, id: Uuid) -> Result<AuthUser, AuthError> {
        self.repo.find_user_by_id(id).await?.ok_or(AuthError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn set_role(&self, id: Uuid, role: Role) -> Result<AuthUser, AuthError> {
        let user = self.repo.set_role(id, role).await?.ok_or(AuthError::NotFound)?;
        info!(event = "role_changed", user_id = %user.id, role = %user.role);
        Ok(user)
    }

    /// Make sure `email` exists as a super admin. An existing account keeps its
    /// password and is promoted; a missing one is created with `password`.
    #[instrument(skip(self, password))]
    pub async fn ensure_super_admin(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let email = user::validate_email(email)?;
        if let Some(existing) = self.repo.find_user_by_email(&email).await? {
            if existing.role == Role::SuperAdmin {
                return Ok(existing);
            }
            return self.set_role(existing.id, Role::SuperAdmin).await;
        }
        check_password(password)?;
        let hash = hash_password(password)?;
        let admin = self.repo.create_user(&email, "Administrator", Role::SuperAdmin).await?;
        self.repo.upsert_password(admin.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(event = "super_admin_bootstrapped", user_id = %admin.id, email = %admin.email);
        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 1, password_algorithm: "argon2".into() },
        )
    }

    fn register(email: &str) -> RegisterInput {
        RegisterInput { email: email.into(), name: "Pat".into(), password: "Passw0rd!".into() }
    }

    #[tokio::test]
    async fn register_creates_customer_and_rejects_duplicates() {
        let svc = svc();
        let user = svc.register(register("pat@example.com")).await.unwrap();
        assert_eq!(user.role, Role::Customer);
        assert!(matches!(svc.register(register("PAT@example.com")).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let svc = svc();
        let mut input = register("pat@example.com");
        input.password = "short".into();
        assert!(matches!(svc.register(input).await, Err(AuthError::Validation(_))));
        assert!(matches!(svc.register(register("nope")).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn login_token_verifies_with_claims() {
        let svc = svc();
        let user = svc.register(register("pat@example.com")).await.unwrap();
        let session = svc.login(LoginInput { email: "pat@example.com".into(), password: "Passw0rd!".into() }).await.unwrap();
        let claims = svc.verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Customer);
        assert_eq!(claims.exp, session.expires_at);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = svc();
        svc.register(register("pat@example.com")).await.unwrap();
        let res = svc.login(LoginInput { email: "pat@example.com".into(), password: "wrong-pass".into() }).await;
        assert!(matches!(res, Err(AuthError::Unauthorized)));
        let res = svc.login(LoginInput { email: "ghost@example.com".into(), password: "Passw0rd!".into() }).await;
        assert!(matches!(res, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn token_from_other_secret_is_rejected() {
        let other = AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: "another".into(), token_ttl_hours: 1, password_algorithm: "argon2".into() },
        );
        let user = AuthUser { id: Uuid::new_v4(), email: "a@b.c".into(), name: "A".into(), role: Role::Admin };
        let (token, _) = other.issue_token(&user).unwrap();
        assert!(matches!(svc().verify_token(&token), Err(AuthError::Unauthorized)));
        assert!(matches!(svc().verify_token("garbage"), Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn ensure_super_admin_creates_then_promotes() {
        let svc = svc();
        let admin = svc.ensure_super_admin("root@example.com", "RootPass1").await.unwrap();
        assert_eq!(admin.role, Role::SuperAdmin);
        let again = svc.ensure_super_admin("root@example.com", "ignored-pass").await.unwrap();
        assert_eq!(again.id, admin.id);

        let customer = svc.register(register("pat@example.com")).await.unwrap();
        let promoted = svc.ensure_super_admin("pat@example.com", "whatever1").await.unwrap();
        assert_eq!(promoted.id, customer.id);
        assert_eq!(promoted.role, Role::SuperAdmin);
    }
}
