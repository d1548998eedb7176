//! Authentication service
//!
//! Issues and validates the bearer tokens that carry a session. Login
//! failures are deliberately uniform: the caller learns "invalid email or
//! password" whether the account is unknown or the password wrong.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{User, UserClaims},
    repository::Store,
};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

#[derive(Clone)]
pub struct SessionsService {
    store: Arc<dyn Store>,
    config: AuthConfig,
}

impl SessionsService {
    pub fn new(store: Arc<dyn Store>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Authenticate by email and password, returning a bearer token and the
    /// authenticated principal. No state is mutated on failure.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .store
            .users_get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let claims = UserClaims::for_user(&user, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(user = %user.email, role = %user.role, "session opened");
        Ok((token, user))
    }

    /// Resolve the principal behind validated claims. A vanished user is an
    /// authentication failure (the token outlived the account); any other
    /// store error propagates unchanged.
    pub async fn current_user(&self, claims: &UserClaims) -> AppResult<User> {
        match self.store.users_get(claims.user_id).await {
            Ok(user) => Ok(user),
            Err(AppError::NotFound(_)) => Err(AppError::Authentication(
                "Session principal no longer exists".to_string(),
            )),
            Err(err) => Err(err),
        }
    }

    /// Validate a bearer token into claims
    pub fn verify_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }
}

fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::Role,
        repository::{MemoryStore, NewUser},
    };

    async fn service_with_user() -> SessionsService {
        let store = Arc::new(MemoryStore::new());
        store
            .users_create(NewUser {
                email: "client@library.com".to_string(),
                name: Some("John Doe".to_string()),
                role: Role::Client,
                password_hash: hash_password("secret").unwrap(),
            })
            .await
            .unwrap();
        SessionsService::new(store, AuthConfig::default())
    }

    #[tokio::test]
    async fn login_with_valid_credentials_yields_verifiable_token() {
        let sessions = service_with_user().await;
        let (token, user) = sessions
            .authenticate("client@library.com", "secret")
            .await
            .unwrap();
        let claims = sessions.verify_token(&token).unwrap();
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.role, Role::Client);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let sessions = service_with_user().await;
        let wrong_password = sessions
            .authenticate("client@library.com", "nope")
            .await
            .unwrap_err();
        let unknown_email = sessions
            .authenticate("ghost@library.com", "secret")
            .await
            .unwrap_err();
        // Same error shape and message; no cause leaked
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn tampered_token_is_an_authentication_error() {
        let sessions = service_with_user().await;
        let err = sessions.verify_token("corrupt.token.here").unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn vanished_principal_is_an_authentication_error() {
        let sessions = service_with_user().await;
        let ghost = User {
            id: uuid::Uuid::new_v4(),
            email: "ghost@library.com".to_string(),
            name: None,
            role: Role::Client,
            password_hash: String::new(),
        };
        let claims = UserClaims::for_user(&ghost, 1);
        let err = sessions.current_user(&claims).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn backend_failure_is_not_reported_as_session_expiry() {
        let sessions = SessionsService::new(Arc::new(DownStore), AuthConfig::default());
        let user = User {
            id: uuid::Uuid::new_v4(),
            email: "client@library.com".to_string(),
            name: None,
            role: Role::Client,
            password_hash: String::new(),
        };
        let claims = UserClaims::for_user(&user, 1);
        let err = sessions.current_user(&claims).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    /// Store double behaving like an unreachable backend: every call fails
    /// with a database error.
    struct DownStore;

    impl DownStore {
        fn down<T>() -> crate::error::AppResult<T> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[async_trait::async_trait]
    impl Store for DownStore {
        async fn users_list(&self) -> crate::error::AppResult<Vec<User>> {
            Self::down()
        }
        async fn users_get(&self, _id: uuid::Uuid) -> crate::error::AppResult<User> {
            Self::down()
        }
        async fn users_get_by_email(
            &self,
            _email: &str,
        ) -> crate::error::AppResult<Option<User>> {
            Self::down()
        }
        async fn users_create(&self, _user: NewUser) -> crate::error::AppResult<User> {
            Self::down()
        }
        async fn categories_list(
            &self,
        ) -> crate::error::AppResult<Vec<crate::models::Category>> {
            Self::down()
        }
        async fn categories_get(
            &self,
            _id: uuid::Uuid,
        ) -> crate::error::AppResult<crate::models::Category> {
            Self::down()
        }
        async fn categories_name_exists(
            &self,
            _name: &str,
            _exclude: Option<uuid::Uuid>,
        ) -> crate::error::AppResult<bool> {
            Self::down()
        }
        async fn categories_create(
            &self,
            _name: &str,
        ) -> crate::error::AppResult<crate::models::Category> {
            Self::down()
        }
        async fn categories_update(
            &self,
            _id: uuid::Uuid,
            _name: &str,
        ) -> crate::error::AppResult<crate::models::Category> {
            Self::down()
        }
        async fn categories_delete(&self, _id: uuid::Uuid) -> crate::error::AppResult<()> {
            Self::down()
        }
        async fn categories_book_count(
            &self,
            _id: uuid::Uuid,
        ) -> crate::error::AppResult<i64> {
            Self::down()
        }
        async fn books_list(&self) -> crate::error::AppResult<Vec<crate::models::Book>> {
            Self::down()
        }
        async fn books_get(
            &self,
            _id: uuid::Uuid,
        ) -> crate::error::AppResult<crate::models::Book> {
            Self::down()
        }
        async fn books_create(
            &self,
            _book: &crate::models::book::CreateBook,
        ) -> crate::error::AppResult<crate::models::Book> {
            Self::down()
        }
        async fn books_update(
            &self,
            _id: uuid::Uuid,
            _book: &crate::models::book::UpdateBook,
        ) -> crate::error::AppResult<crate::models::Book> {
            Self::down()
        }
        async fn books_delete(&self, _id: uuid::Uuid) -> crate::error::AppResult<()> {
            Self::down()
        }
        async fn books_loan_count(&self, _id: uuid::Uuid) -> crate::error::AppResult<i64> {
            Self::down()
        }
        async fn emprunts_list(
            &self,
        ) -> crate::error::AppResult<Vec<crate::models::emprunt::EmpruntRow>> {
            Self::down()
        }
        async fn emprunts_list_for_user(
            &self,
            _user_id: uuid::Uuid,
        ) -> crate::error::AppResult<Vec<crate::models::emprunt::EmpruntRow>> {
            Self::down()
        }
        async fn emprunts_get(
            &self,
            _id: uuid::Uuid,
        ) -> crate::error::AppResult<crate::models::emprunt::EmpruntRow> {
            Self::down()
        }
        async fn emprunts_borrow(
            &self,
            _user_id: uuid::Uuid,
            _book_id: uuid::Uuid,
        ) -> crate::error::AppResult<crate::models::emprunt::EmpruntRow> {
            Self::down()
        }
        async fn emprunts_validate(
            &self,
            _id: uuid::Uuid,
            _at: chrono::DateTime<chrono::Utc>,
        ) -> crate::error::AppResult<crate::models::emprunt::EmpruntRow> {
            Self::down()
        }
        async fn emprunts_close(
            &self,
            _id: uuid::Uuid,
            _at: chrono::DateTime<chrono::Utc>,
        ) -> crate::error::AppResult<crate::models::emprunt::EmpruntRow> {
            Self::down()
        }
    }
}
