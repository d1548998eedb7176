//! API handlers for the LibraryMS REST endpoints

pub mod auth;
pub mod books;
pub mod categories;
pub mod emprunts;
pub mod health;
pub mod navigation;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for the authenticated user from the bearer token.
///
/// Every failure mode here (missing header, malformed token, expired or
/// tampered signature) is a 401: the signal for the dashboard client to
/// tear its stored session down and return to the login view.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::Authentication("Invalid authorization header format".to_string())
            })?;

        let claims = state.services.sessions.verify_token(token)?;
        Ok(AuthenticatedUser(claims))
    }
}
