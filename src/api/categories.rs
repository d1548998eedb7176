//! Category management endpoints (ADMIN only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    access,
    error::AppResult,
    models::category::{Category, CreateCategory, UpdateCategory},
};

use super::AuthenticatedUser;

/// List all categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All categories", body = Vec<Category>),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Category>>> {
    access::authorize(claims.role, "/dashboard/categories")?;

    let categories = state.services.categories.list().await?;
    Ok(Json(categories))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(category): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    access::authorize(claims.role, "/dashboard/categories")?;
    category.validate()?;

    let created = state.services.categories.create(category).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn update_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(category): Json<UpdateCategory>,
) -> AppResult<Json<Category>> {
    access::authorize(claims.role, "/dashboard/categories")?;
    category.validate()?;

    let updated = state.services.categories.update(id, category).await?;
    Ok(Json(updated))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still referenced by books")
    )
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    access::authorize(claims.role, "/dashboard/categories")?;

    state.services.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
