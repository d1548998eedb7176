//! Loan (emprunt) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    access,
    error::AppResult,
    models::emprunt::{CreateEmprunt, Emprunt},
};

use super::AuthenticatedUser;

/// List all loans (loan desk view)
#[utoipa::path(
    get,
    path = "/emprunts",
    tag = "emprunts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All loans", body = Vec<Emprunt>),
        (status = 403, description = "Not a responsable")
    )
)]
pub async fn list_emprunts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Emprunt>>> {
    access::authorize(claims.role, "/dashboard/emprunts")?;

    let emprunts = state.services.emprunts.list_all().await?;
    Ok(Json(emprunts))
}

/// List the caller's own loans
#[utoipa::path(
    get,
    path = "/emprunts/my",
    tag = "emprunts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's loans", body = Vec<Emprunt>),
        (status = 403, description = "Not a client")
    )
)]
pub async fn list_my_emprunts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Emprunt>>> {
    access::authorize(claims.role, "/dashboard/my-emprunts")?;

    let emprunts = state
        .services
        .emprunts
        .list_for_user(claims.user_id)
        .await?;
    Ok(Json(emprunts))
}

/// Borrow a book (clients only)
#[utoipa::path(
    post,
    path = "/emprunts",
    tag = "emprunts",
    security(("bearer_auth" = [])),
    request_body = CreateEmprunt,
    responses(
        (status = 201, description = "Loan created", body = Emprunt),
        (status = 404, description = "Book not found"),
        (status = 409, description = "No copies available")
    )
)]
pub async fn create_emprunt(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateEmprunt>,
) -> AppResult<(StatusCode, Json<Emprunt>)> {
    claims.require_client()?;

    let emprunt = state
        .services
        .emprunts
        .borrow(claims.user_id, request.book_id)
        .await?;
    Ok((StatusCode::CREATED, Json(emprunt)))
}

/// Validate an active loan, resetting its overdue clock
#[utoipa::path(
    put,
    path = "/emprunts/{id}/validate",
    tag = "emprunts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Emprunt ID")),
    responses(
        (status = 200, description = "Loan validated", body = Emprunt),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn validate_emprunt(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Emprunt>> {
    claims.require_responsable()?;

    let emprunt = state.services.emprunts.validate(id).await?;
    Ok(Json(emprunt))
}

/// Record the return of a loan
#[utoipa::path(
    put,
    path = "/emprunts/{id}/close",
    tag = "emprunts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Emprunt ID")),
    responses(
        (status = 200, description = "Loan closed", body = Emprunt),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn close_emprunt(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Emprunt>> {
    claims.require_responsable()?;

    let emprunt = state.services.emprunts.close(id).await?;
    Ok(Json(emprunt))
}
