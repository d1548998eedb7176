//! User model and JWT claims

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::role::Role;
use crate::error::AppError;

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|e: String| AppError::Internal(format!("Corrupt user row: {}", e)))?;
        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name,
            role,
            password_hash: row.password_hash,
        })
    }
}

/// Full user model, including credentials. Never serialized to the wire;
/// handlers expose [`UserPublic`] instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub password_hash: String,
}

impl User {
    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Principal as seen by clients: identity plus role, no credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: Role,
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: Uuid,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Build claims for a user with the given validity window
    pub fn for_user(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp: now + (expiration_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and validate a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks for role-restricted actions

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }

    pub fn require_responsable(&self) -> Result<(), AppError> {
        if self.role == Role::Responsable {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Responsable privileges required".to_string(),
            ))
        }
    }

    pub fn require_client(&self) -> Result<(), AppError> {
        if self.role == Role::Client {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only clients may perform this action".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "admin@library.com".to_string(),
            name: Some("Admin".to_string()),
            role: Role::Admin,
            password_hash: String::new(),
        }
    }

    #[test]
    fn claims_round_trip_through_token() {
        let user = sample_user();
        let claims = UserClaims::for_user(&user, 24);
        let token = claims.create_token("test-secret").unwrap();
        let parsed = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(parsed.user_id, user.id);
        assert_eq!(parsed.role, Role::Admin);
        assert_eq!(parsed.sub, "admin@library.com");
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let claims = UserClaims::for_user(&sample_user(), 24);
        let token = claims.create_token("secret-a").unwrap();
        assert!(UserClaims::from_token(&token, "secret-b").is_err());
    }

    #[test]
    fn garbage_token_is_rejected_not_panicking() {
        assert!(UserClaims::from_token("not-a-jwt", "secret").is_err());
        assert!(UserClaims::from_token("", "secret").is_err());
    }

    #[test]
    fn public_view_never_carries_credentials() {
        let user = sample_user();
        let json = serde_json::to_value(user.to_public()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "ADMIN");
    }
}
