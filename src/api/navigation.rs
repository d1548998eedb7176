//! Navigation endpoint
//!
//! Serves the role-filtered menu the dashboard sidebar renders, derived
//! from the same policy table the guard enforces.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{access, error::AppResult};

use super::AuthenticatedUser;

/// Navigation menu for the caller's role
#[derive(Serialize, ToSchema)]
pub struct NavigationResponse {
    pub entries: Vec<access::NavEntry>,
}

/// Get the navigation menu for the authenticated role
#[utoipa::path(
    get,
    path = "/navigation",
    tag = "navigation",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Menu entries in display order", body = NavigationResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_navigation(
    State(_state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<NavigationResponse>> {
    Ok(Json(NavigationResponse {
        entries: access::entries_for(Some(claims.role)),
    }))
}
