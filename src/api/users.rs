//! User directory endpoints (read-only, ADMIN only)

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{access, error::AppResult, models::user::UserPublic};

use super::AuthenticatedUser;

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<UserPublic>),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<UserPublic>>> {
    access::authorize(claims.role, "/dashboard/users")?;

    let users = state.services.users.list().await?;
    Ok(Json(users))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserPublic),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserPublic>> {
    access::authorize(claims.role, "/dashboard/users")?;

    let user = state.services.users.get(id).await?;
    Ok(Json(user))
}
