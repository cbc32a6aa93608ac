use async_trait::async_trait;
use models::user::Role;
use uuid::Uuid;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Persistence used by [`super::AuthService`].
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// `email` is already normalized (trimmed, lowercase).
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, email: &str, name: &str, role: Role) -> Result<AuthUser, AuthError>;
    /// `Ok(None)` when no such user exists.
    async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<AuthUser>, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<Uuid, AuthUser>>,    // key: user id
        creds: Mutex<HashMap<Uuid, Credentials>>, // key: user_id
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap_or_else(|p| p.into_inner());
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap_or_else(|p| p.into_inner());
            Ok(users.get(&id).cloned())
        }

        async fn create_user(&self, email: &str, name: &str, role: Role) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().unwrap_or_else(|p| p.into_inner());
            if users.values().any(|u| u.email == email) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser { id: Uuid::new_v4(), email: email.to_string(), name: name.to_string(), role };
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<AuthUser>, AuthError> {
            let mut users = self.users.lock().unwrap_or_else(|p| p.into_inner());
            Ok(users.get_mut(&id).map(|u| {
                u.role = role;
                u.clone()
            }))
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap_or_else(|p| p.into_inner());
            Ok(creds.get(&user_id).cloned())
        }

        async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().unwrap_or_else(|p| p.into_inner());
            let c = Credentials { user_id, password_hash, password_algorithm };
            creds.insert(user_id, c.clone());
            Ok(c)
        }
    }
}
