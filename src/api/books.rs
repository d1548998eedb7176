//! Book catalog endpoints
//!
//! The listing is the one deliberately role-dispatched route: ADMIN gets
//! the management view, CLIENT gets the browse view with per-book borrow
//! availability, RESPONSABLE gets neither (the dashboard redirects). The
//! dispatch is an explicit special case, not part of the generic policy
//! table.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    access::{self, BooksView},
    error::{AppError, AppResult},
    models::book::{Book, BorrowableBook, CreateBook, UpdateBook},
};

use super::AuthenticatedUser;

/// Role-dependent books listing
#[derive(Serialize, ToSchema)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum BooksResponse {
    /// Management view (ADMIN)
    Admin { books: Vec<Book> },
    /// Browse/borrow view (CLIENT)
    Client { books: Vec<BorrowableBook> },
}

/// List books, dispatched by role
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Books listing for the caller's role", body = BooksResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role has no books view")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<BooksResponse>> {
    match access::books_view(claims.role) {
        Some(BooksView::Admin) => {
            let books = state.services.books.list().await?;
            Ok(Json(BooksResponse::Admin { books }))
        }
        Some(BooksView::Client) => {
            let books = state.services.books.list_borrowable().await?;
            Ok(Json(BooksResponse::Client { books }))
        }
        None => Err(AppError::Authorization(format!(
            "Role {} has no books view",
            claims.role
        ))),
    }
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Book>> {
    access::authorize(claims.role, "/dashboard/books")?;

    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_admin()?;
    book.validate()?;

    let created = state.services.books.create(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(book): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_admin()?;
    book.validate()?;

    let updated = state.services.books.update(id, book).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
